use crate::resource::ResourceLoader;
use crate::split::{is_skippable, split_quoted};
use crate::{DictError, DictResult};
use crc32fast::Hasher as Crc32;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// How a text source is turned into a dictionary.
#[derive(Debug, Clone)]
pub struct DictOptions {
    /// Cell separator, usually `,`
    pub delimiter: char,
    /// Zero-based column whose value keys each row
    pub key_index: usize,
    /// File or resource name used in error messages
    pub source_name: String,
}

impl Default for DictOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            key_index: 0,
            source_name: "unknown".to_string(),
        }
    }
}

impl DictOptions {
    pub fn new(delimiter: char, key_index: usize) -> Self {
        Self {
            delimiter,
            key_index,
            ..Default::default()
        }
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }
}

/// A delimited text file held in memory as rows keyed by one column.
///
/// The first non-comment line is the header. Every later line is a row,
/// indexed by its cell at `key_index`; when a key repeats, the later row's
/// cells replace the earlier ones but the row keeps its original place in
/// table order. The table never changes after construction, so a `CsvDict`
/// can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct CsvDict {
    source_name: String,
    key_index: usize,
    field_names: Vec<String>,
    positions: HashMap<String, usize>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl CsvDict {
    /// Loads the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, delimiter: char, key_index: usize) -> DictResult<Self> {
        let path = path.as_ref();
        let options =
            DictOptions::new(delimiter, key_index).with_source_name(path.display().to_string());
        Self::from_path_with_options(path, options)
    }

    pub fn from_path_with_options(path: &Path, options: DictOptions) -> DictResult<Self> {
        let file = File::open(path).map_err(|source| DictError::Io {
            source_name: options.source_name.clone(),
            source,
        })?;
        Self::from_reader_with_options(BufReader::new(file), options)
    }

    /// Loads from an already-open reader. The reader is consumed to its end.
    pub fn from_reader<R: BufRead>(reader: R, delimiter: char, key_index: usize) -> DictResult<Self> {
        Self::from_reader_with_options(reader, DictOptions::new(delimiter, key_index))
    }

    pub fn from_reader_with_options<R: BufRead>(reader: R, options: DictOptions) -> DictResult<Self> {
        let mut loader = DictLoader::new(options);
        for line in reader.lines() {
            let line = line.map_err(|source| DictError::Io {
                source_name: loader.source_name().to_string(),
                source,
            })?;
            loader.push_line(&line)?;
        }
        loader.finish()
    }

    /// Loads the resource `name` through `loader`; the opened resource is
    /// dropped before this returns.
    pub fn from_resource<L>(
        name: &str,
        delimiter: char,
        key_index: usize,
        loader: &L,
    ) -> DictResult<Self>
    where
        L: ResourceLoader + ?Sized,
    {
        let reader = loader
            .open(name)
            .map_err(|source| DictError::Io {
                source_name: name.to_string(),
                source,
            })?
            .ok_or_else(|| DictError::ResourceNotFound {
                name: name.to_string(),
            })?;
        let options = DictOptions::new(delimiter, key_index).with_source_name(name);
        Self::from_reader_with_options(reader, options)
    }

    /// Raw cell at `pos` of the row keyed by `key`. Empty cells come back as `""`.
    pub fn get_string(&self, key: &str, pos: usize) -> DictResult<&str> {
        let columns = self.field_names.len();
        if pos >= columns {
            return Err(DictError::PositionOutOfRange { pos, columns });
        }
        let row = self.row(key).ok_or_else(|| DictError::RowNotFound {
            source_name: self.source_name.clone(),
            key_field: self.key_field().to_string(),
            key: key.to_string(),
        })?;
        row.get(pos)
            .map(String::as_str)
            .ok_or_else(|| DictError::CellMissing {
                key: key.to_string(),
                pos,
                len: row.len(),
            })
    }

    /// Cell as `f64`. Blank or unparsable cells give `f64::NAN`, not an error;
    /// only a missing row or bad position fails.
    pub fn get_float(&self, key: &str, pos: usize) -> DictResult<f64> {
        let cell = self.get_string(key, pos)?;
        Ok(float_value(cell).unwrap_or(f64::NAN))
    }

    /// Cell as `i64`. Blank or unparsable cells give `i64::MAX`, not an error;
    /// only a missing row or bad position fails.
    pub fn get_integer(&self, key: &str, pos: usize) -> DictResult<i64> {
        let cell = self.get_string(key, pos)?;
        Ok(integer_value(cell).unwrap_or(i64::MAX))
    }

    /// Number of distinct keys.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header names in file order, duplicates included.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn key_field(&self) -> &str {
        &self.field_names[self.key_index]
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Position of a header name; for repeated names the last one wins.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn row(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.rows[i].as_slice())
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        // every stored row has a cell at key_index, checked on load
        self.rows.iter().map(|row| row[self.key_index].as_str())
    }

    /// Rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// One cell per row from column `pos`, or `None` if `pos` is past the header.
    pub fn column(&self, pos: usize) -> Option<Vec<&str>> {
        if pos >= self.field_names.len() {
            return None;
        }
        Some(self.rows.iter().map(|row| cell_or_empty(row, pos)).collect())
    }

    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        self.column(self.column_position(name)?)
    }

    /// Values of `field` for every row whose `filter_field` cell equals
    /// `value` exactly. `None` if either name is unknown.
    pub fn filtered_column(
        &self,
        field: &str,
        filter_field: &str,
        value: &str,
    ) -> Option<Vec<&str>> {
        let pos = self.column_position(field)?;
        let filter_pos = self.column_position(filter_field)?;
        self.filtered_column_at(pos, filter_pos, value)
    }

    pub fn filtered_column_at(
        &self,
        pos: usize,
        filter_pos: usize,
        value: &str,
    ) -> Option<Vec<&str>> {
        let columns = self.field_names.len();
        if pos >= columns || filter_pos >= columns {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter(|row| row.get(filter_pos).is_some_and(|cell| cell == value))
                .map(|row| cell_or_empty(row, pos))
                .collect(),
        )
    }

    /// CRC32 over the header and rows in table order; cells are separated by
    /// `0x1f` and rows by `0x1e`.
    pub fn fingerprint(&self) -> u32 {
        let mut crc = Crc32::new();
        update_crc(&mut crc, &self.field_names);
        for row in &self.rows {
            crc.update(&[0x1e]);
            update_crc(&mut crc, row);
        }
        crc.finalize()
    }
}

fn update_crc(crc: &mut Crc32, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            crc.update(&[0x1f]);
        }
        crc.update(cell.as_bytes());
    }
}

fn cell_or_empty(row: &[String], pos: usize) -> &str {
    row.get(pos).map_or("", String::as_str)
}

/// Parsed float, `None` for blank or malformed text.
///
/// Infinite and NaN values are only spelled `Infinity` / `NaN` (optionally
/// signed); `inf`, `infinity` and `nan` in other cases count as malformed.
/// Overflowing numerals such as `1e999` still read as infinite.
pub(crate) fn float_value(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() {
        return Some(value);
    }
    let unsigned = trimmed.trim_start_matches(|c: char| c == '+' || c == '-');
    let numeral = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.');
    (numeral || matches!(unsigned, "Infinity" | "NaN")).then_some(value)
}

/// Parsed integer, `None` for blank or malformed text. Surrounding
/// whitespace is not accepted.
pub(crate) fn integer_value(cell: &str) -> Option<i64> {
    if cell.trim().is_empty() {
        return None;
    }
    cell.parse().ok()
}

/// The single load routine behind every constructor: feed it lines (or
/// pre-split cells) in file order, then `finish`.
pub(crate) struct DictLoader {
    options: DictOptions,
    field_names: Option<Vec<String>>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    records: usize,
    replaced: usize,
}

impl DictLoader {
    pub(crate) fn new(options: DictOptions) -> Self {
        debug!(
            source = %options.source_name,
            key_index = options.key_index,
            "loading dictionary"
        );
        Self {
            options,
            field_names: None,
            index: HashMap::new(),
            rows: Vec::new(),
            records: 0,
            replaced: 0,
        }
    }

    pub(crate) fn source_name(&self) -> &str {
        &self.options.source_name
    }

    #[cfg_attr(not(feature = "fast_local"), allow(dead_code))]
    pub(crate) fn has_header(&self) -> bool {
        self.field_names.is_some()
    }

    pub(crate) fn push_line(&mut self, line: &str) -> DictResult<()> {
        if is_skippable(line) {
            trace!(line, "skipping comment or blank line");
            return Ok(());
        }
        let cells = split_quoted(line, self.options.delimiter);
        self.push_cells(cells)
    }

    /// Takes one already-split, non-comment line.
    pub(crate) fn push_cells(&mut self, cells: Vec<String>) -> DictResult<()> {
        if self.field_names.is_none() {
            let columns = cells.len();
            if self.options.key_index >= columns {
                return Err(DictError::KeyIndexOutOfRange {
                    key_index: self.options.key_index,
                    columns,
                });
            }
            self.field_names = Some(cells);
            return Ok(());
        }

        self.records += 1;
        let key = cells
            .get(self.options.key_index)
            .cloned()
            .ok_or(DictError::KeyCellMissing {
                record: self.records,
                key_index: self.options.key_index,
                len: cells.len(),
            })?;
        match self.index.entry(key) {
            Entry::Occupied(slot) => {
                self.rows[*slot.get()] = cells;
                self.replaced += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(self.rows.len());
                self.rows.push(cells);
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> DictResult<CsvDict> {
        let Some(field_names) = self.field_names else {
            return Err(DictError::MissingHeader {
                source_name: self.options.source_name,
            });
        };
        let positions = field_names
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.clone(), pos))
            .collect();

        debug!(
            source = %self.options.source_name,
            fields = field_names.len(),
            rows = self.rows.len(),
            replaced = self.replaced,
            "dictionary loaded"
        );
        Ok(CsvDict {
            source_name: self.options.source_name,
            key_index: self.options.key_index,
            field_names,
            positions,
            index: self.index,
            rows: self.rows,
        })
    }
}
