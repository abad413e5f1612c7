use crate::dict::{integer_value, CsvDict};
use crate::resource::ResourceLoader;
use crate::{DictError, DictResult, IntKeyError};
use std::ops::Deref;
use std::path::Path;

/// A [`CsvDict`] whose key column holds integers.
///
/// Construction fails with [`DictError::NoData`] on an empty table and with
/// [`IntKeyError::InvalidArgument`] if any key is not an integer. The typed
/// getters take the key as an `i64`; the string-keyed ones stay reachable
/// through [`IntKeyCsvDict::as_dict`] or `Deref`.
#[derive(Debug, Clone)]
pub struct IntKeyCsvDict {
    dict: CsvDict,
}

impl IntKeyCsvDict {
    pub fn new(dict: CsvDict) -> Result<Self, IntKeyError> {
        if dict.is_empty() {
            return Err(DictError::NoData {
                source_name: dict.source_name().to_string(),
            }
            .into());
        }
        if let Some(key) = dict.keys().find(|key| integer_value(key).is_none()) {
            return Err(IntKeyError::InvalidArgument {
                key: key.to_string(),
            });
        }
        Ok(Self { dict })
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        delimiter: char,
        key_index: usize,
    ) -> Result<Self, IntKeyError> {
        Self::new(CsvDict::from_path(path, delimiter, key_index)?)
    }

    pub fn from_reader<R: std::io::BufRead>(
        reader: R,
        delimiter: char,
        key_index: usize,
    ) -> Result<Self, IntKeyError> {
        Self::new(CsvDict::from_reader(reader, delimiter, key_index)?)
    }

    pub fn from_resource<L>(
        name: &str,
        delimiter: char,
        key_index: usize,
        loader: &L,
    ) -> Result<Self, IntKeyError>
    where
        L: ResourceLoader + ?Sized,
    {
        Self::new(CsvDict::from_resource(name, delimiter, key_index, loader)?)
    }

    /// Async counterpart of [`IntKeyCsvDict::from_path`]; see [`CsvDict::open`].
    pub async fn open(
        path: impl AsRef<Path>,
        delimiter: char,
        key_index: usize,
    ) -> Result<Self, IntKeyError> {
        Self::new(CsvDict::open(path, delimiter, key_index).await?)
    }

    pub fn get_string(&self, key: i64, pos: usize) -> DictResult<&str> {
        self.dict.get_string(&key.to_string(), pos)
    }

    pub fn get_float(&self, key: i64, pos: usize) -> DictResult<f64> {
        self.dict.get_float(&key.to_string(), pos)
    }

    pub fn get_integer(&self, key: i64, pos: usize) -> DictResult<i64> {
        self.dict.get_integer(&key.to_string(), pos)
    }

    pub fn as_dict(&self) -> &CsvDict {
        &self.dict
    }

    pub fn into_inner(self) -> CsvDict {
        self.dict
    }
}

impl Deref for IntKeyCsvDict {
    type Target = CsvDict;

    fn deref(&self) -> &CsvDict {
        &self.dict
    }
}
