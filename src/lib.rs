//! Keyed in-memory lookup tables over delimited text files.
//!
//! - Sync path: file path, any `BufRead`, or a named resource via [`ResourceLoader`].
//! - Async path: local files and gzip/zstd, optional charset transcoding.
//! - Fast local path: feature `fast_local`, uncompressed local UTF-8 only.
//!
//! Data shape:
//! - `CsvDict`: header catalog + rows keyed by one column, file order kept
//! - Typed reads: `get_string` / `get_float` (NaN when blank or malformed) /
//!   `get_integer` (`i64::MAX` when blank or malformed)
//! - `IntKeyCsvDict`: same table, keys checked to be integers, `i64` lookups
//!
//! The [`codegen`] module turns a dictionary into a Rust row type backed by a
//! [`RowCache`]; the `csvdict-gen` binary drives it from a properties file.
#![cfg_attr(docsrs, feature(doc_cfg))]
//
mod cache;
mod codec;
pub mod codegen;
mod dict;
#[cfg(feature = "fast_local")]
mod fast;
mod int_key;
mod io;
mod resource;
mod split;

pub use crate::cache::RowCache;
pub use crate::dict::{CsvDict, DictOptions};
#[cfg(feature = "fast_local")]
pub use crate::fast::fast_local_load;
pub use crate::int_key::IntKeyCsvDict;
pub use crate::io::{build_csv_reader, reader_from_path, CsvMeta};
pub use crate::resource::{DirLoader, EmbeddedResources, ResourceLoader};

use thiserror::Error;

/// Errors raised while loading or querying a dictionary.
///
/// Blank or malformed numeric cells are never reported here; they read back
/// as `f64::NAN` / `i64::MAX` instead.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("cannot read {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode lines of {source_name}: {source}")]
    Decode {
        source_name: String,
        #[source]
        source: tokio_util::codec::LinesCodecError,
    },
    #[error("resource loader can't load {name}")]
    ResourceNotFound { name: String },
    #[error("{source_name} has no header row")]
    MissingHeader { source_name: String },
    #[error("trying to key CSV file with {columns} columns on column {}", .key_index + 1)]
    KeyIndexOutOfRange { key_index: usize, columns: usize },
    #[error("data record {record} has {len} fields, no key at position {key_index}")]
    KeyCellMissing {
        record: usize,
        key_index: usize,
        len: usize,
    },
    #[error("no row in {source_name} with {key_field} value {key}")]
    RowNotFound {
        source_name: String,
        key_field: String,
        key: String,
    },
    #[error("pos ({pos}) >= number of columns ({columns})")]
    PositionOutOfRange { pos: usize, columns: usize },
    #[error("row with key {key} has only {len} fields, no value at position {pos}")]
    CellMissing { key: String, pos: usize, len: usize },
    #[error("{source_name} has no data rows")]
    NoData { source_name: String },
}

/// Errors raised when building an [`IntKeyCsvDict`].
///
/// A key that is not an integer is an argument problem, not a dictionary
/// problem, so it is kept apart from [`DictError`].
#[derive(Debug, Error)]
pub enum IntKeyError {
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error("trying to build an integer-keyed dictionary with non-integer key {key:?}")]
    InvalidArgument { key: String },
}

pub type DictResult<T> = std::result::Result<T, DictError>;
