//! Properties-style generator config.
//!
//! One line per CSV file:
//!
//! ```text
//! # file = type path, key index, key type [, key index, key type, suffix]...
//! woody.csv = fuelbed.calculators.WoodyIV,0,int,1,String,_ByName
//! duff.csv  = fuelbed.calculators.DuffIV,0,int
//! ```
//!
//! The first key spec produces the named type; every further spec produces
//! another type over the same file, named with its suffix appended.

use super::GenError;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Int,
    Text,
}

impl FromStr for KeyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(KeyKind::Int),
            "String" | "string" => Ok(KeyKind::Text),
            other => Err(format!("key type must be int or String, got {other:?}")),
        }
    }
}

/// One type to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `.` or `::` separated; the last segment is the type name
    pub type_path: String,
    pub key_index: usize,
    pub key_kind: KeyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvEntry {
    pub file: String,
    pub line: usize,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenConfig {
    pub entries: Vec<CsvEntry>,
}

impl GenConfig {
    pub fn from_path(path: &Path) -> Result<Self, GenError> {
        let text = std::fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn target_count(&self) -> usize {
        self.entries.iter().map(|e| e.targets.len()).sum()
    }
}

impl FromStr for GenConfig {
    type Err = GenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (file, value) = match line.find(|c: char| c == '=' || c == ':') {
                Some(at) => (line[..at].trim(), line[at + 1..].trim()),
                None => (line, ""),
            };
            if !file.ends_with(".csv") {
                continue;
            }
            let targets = parse_targets(value).map_err(|message| GenError::Config {
                line: i + 1,
                message,
            })?;
            entries.push(CsvEntry {
                file: file.to_string(),
                line: i + 1,
                targets,
            });
        }
        Ok(GenConfig { entries })
    }
}

fn parse_targets(value: &str) -> Result<Vec<Target>, String> {
    let mut items = value.split(',').map(str::trim);
    let type_path = match items.next() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Err("missing type name".to_string()),
    };
    let items: Vec<&str> = items.collect();
    if items.len() < 2 {
        return Err("missing key index and key type".to_string());
    }

    let mut targets = Vec::new();
    let mut rest = &items[..];
    while !rest.is_empty() {
        let first = targets.is_empty();
        let width = if first { 2 } else { 3 };
        if rest.len() < width {
            return Err(format!(
                "incomplete key spec {:?}: expected key index, key type, suffix",
                rest.join(",")
            ));
        }
        let key_index = rest[0]
            .parse()
            .map_err(|_| format!("key index must be a column number, got {:?}", rest[0]))?;
        let key_kind = rest[1].parse()?;
        let type_path = if first {
            type_path.clone()
        } else {
            format!("{type_path}{}", rest[2])
        };
        targets.push(Target {
            type_path,
            key_index,
            key_kind,
        });
        rest = &rest[width..];
    }
    Ok(targets)
}
