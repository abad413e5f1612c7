// @generated by csvdict-gen from species.csv (fingerprint 0x50a1474d); do not edit.

use std::sync::Arc;

use csvdict::{CsvDict, DictError, DictOptions, RowCache};

const SOURCE: &str = include_str!("../../data/species.csv");

static TABLE: RowCache<(), CsvDict> = RowCache::new();
static CACHE: RowCache<String, SpeciesIV_ByName> = RowCache::new();

/// One row of `species.csv`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesIV_ByName {
    pub map_id: f64,
    pub scientific_name: String,
    pub height_m: f64,
    pub canopy: f64,
    pub note: String,
}

impl SpeciesIV_ByName {
    /// Returns the row whose `Scientific Name` is `key`, loading it on first use.
    pub fn get_instance(key: &str) -> Result<Arc<Self>, DictError> {
        CACHE.get_or_try_insert_with(key.to_string(), || Self::load(key))
    }

    fn load(key: &str) -> Result<Self, DictError> {
        let dict = TABLE.get_or_try_insert_with((), || {
            let options = DictOptions::new(',', 1)
                .with_source_name("species.csv");
            CsvDict::from_reader_with_options(SOURCE.as_bytes(), options)
        })?;
        Ok(Self {
            map_id: dict.get_float(key, 0)?,
            scientific_name: key.to_string(),
            height_m: dict.get_float(key, 2)?,
            canopy: dict.get_float(key, 3)?,
            note: dict.get_string(key, 4)?.to_string(),
        })
    }
}
