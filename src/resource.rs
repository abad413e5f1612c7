use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Resolves a resource name to something readable.
///
/// `Ok(None)` means the name is unknown to this loader; `Err` means it was
/// found but could not be opened.
pub trait ResourceLoader {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>>;
}

/// Resolves names as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for DirLoader {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        match File::open(self.root.join(name)) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Text compiled into the binary, usually with `include_str!`.
///
/// ```
/// use csvdict::{CsvDict, EmbeddedResources};
///
/// let resources = EmbeddedResources::new().with("trees.csv", "Name,Height\nOak,20\n");
/// let dict = CsvDict::from_resource("trees.csv", ',', 0, &resources).unwrap();
/// assert_eq!(dict.get_float("Oak", 1).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<&'static str, &'static str>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, text: &'static str) -> Self {
        self.entries.insert(name, text);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(&'static str, &'static str)> for EmbeddedResources {
    fn from_iter<I: IntoIterator<Item = (&'static str, &'static str)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ResourceLoader for EmbeddedResources {
    fn open(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        Ok(self
            .entries
            .get(name)
            .map(|text| Box::new(text.as_bytes()) as Box<dyn BufRead + '_>))
    }
}
