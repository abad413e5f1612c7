// @generated by csvdict-gen from species.csv (fingerprint 0x50a1474d); do not edit.

use std::sync::Arc;

use csvdict::{CsvDict, DictOptions, IntKeyCsvDict, IntKeyError, RowCache};

const SOURCE: &str = include_str!("../../data/species.csv");
const CUSTOM_START: i64 = 5000;

static TABLE: RowCache<(), IntKeyCsvDict> = RowCache::new();
static CACHE: RowCache<i64, SpeciesIV> = RowCache::new();

/// One row of `species.csv`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesIV {
    pub map_id: i64,
    pub scientific_name: String,
    pub height_m: f64,
    pub canopy: f64,
    pub note: String,
}

impl SpeciesIV {
    /// Returns the row whose `MapID` is `key`, loading it on first use.
    pub fn get_instance(key: i64) -> Result<Arc<Self>, IntKeyError> {
        CACHE.get_or_try_insert_with(key, || Self::load(key))
    }

    /// Caches a row that is not in the source file and returns its new key.
    pub fn add_row(row: Self) -> i64 {
        CACHE.insert_next_id(CUSTOM_START, row)
    }

    fn load(key: i64) -> Result<Self, IntKeyError> {
        let dict = TABLE.get_or_try_insert_with((), || {
            let options = DictOptions::new(',', 0)
                .with_source_name("species.csv");
            CsvDict::from_reader_with_options(SOURCE.as_bytes(), options)
                .map_err(IntKeyError::from)
                .and_then(IntKeyCsvDict::new)
        })?;
        Ok(Self {
            map_id: key,
            scientific_name: dict.get_string(key, 1)?.to_string(),
            height_m: dict.get_float(key, 2)?,
            canopy: dict.get_float(key, 3)?,
            note: dict.get_string(key, 4)?.to_string(),
        })
    }
}
