use super::config::KeyKind;
use super::ident::field_idents;
use crate::dict::{float_value, CsvDict};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
    Text,
}

impl FieldType {
    fn rust_type(self) -> &'static str {
        match self {
            FieldType::Int => "i64",
            FieldType::Float => "f64",
            FieldType::Text => "String",
        }
    }
}

/// Column types for generated fields: the key column follows the key kind;
/// any other column is a float when it has values and all of them parse as
/// floats, otherwise text.
pub fn infer_field_types(dict: &CsvDict, key_kind: KeyKind) -> Vec<FieldType> {
    (0..dict.field_names().len())
        .map(|pos| {
            if pos == dict.key_index() {
                return match key_kind {
                    KeyKind::Int => FieldType::Int,
                    KeyKind::Text => FieldType::Text,
                };
            }
            let column = dict.column(pos).unwrap_or_default();
            let mut values = column.iter().filter(|v| !v.trim().is_empty()).peekable();
            if values.peek().is_none() {
                return FieldType::Text;
            }
            if values.all(|v| float_value(v).is_some()) {
                FieldType::Float
            } else {
                FieldType::Text
            }
        })
        .collect()
}

/// Everything the template needs for one generated type.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    pub dict: &'a CsvDict,
    pub type_name: &'a str,
    pub key_kind: KeyKind,
    /// file name shown in the header comment
    pub source_file: &'a str,
    /// path handed to `include_str!`
    pub include_path: &'a str,
    pub delimiter: char,
}

pub const CUSTOM_START: i64 = 5000;

/// Renders one self-contained Rust module for `input`.
pub fn render_module(input: &RenderInput<'_>) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    let _ = write_module(&mut out, input);
    out
}

fn write_module(out: &mut String, input: &RenderInput<'_>) -> fmt::Result {
    let dict = input.dict;
    let ty = input.type_name;
    let key_index = dict.key_index();
    let idents = field_idents(dict.field_names());
    let types = infer_field_types(dict, input.key_kind);
    let int_key = input.key_kind == KeyKind::Int;

    let (dict_type, error_type, key_param, cache_key, key_value) = if int_key {
        ("IntKeyCsvDict", "IntKeyError", "key: i64", "i64", "key")
    } else {
        ("CsvDict", "DictError", "key: &str", "String", "key.to_string()")
    };

    writeln!(
        out,
        "// @generated by csvdict-gen from {} (fingerprint 0x{:08x}); do not edit.",
        input.source_file,
        dict.fingerprint()
    )?;
    writeln!(out)?;
    writeln!(out, "use std::sync::Arc;")?;
    writeln!(out)?;
    if int_key {
        writeln!(
            out,
            "use csvdict::{{CsvDict, DictOptions, IntKeyCsvDict, IntKeyError, RowCache}};"
        )?;
    } else {
        writeln!(out, "use csvdict::{{CsvDict, DictError, DictOptions, RowCache}};")?;
    }
    writeln!(out)?;
    writeln!(out, "const SOURCE: &str = include_str!({:?});", input.include_path)?;
    if int_key {
        writeln!(out, "const CUSTOM_START: i64 = {CUSTOM_START};")?;
    }
    writeln!(out)?;
    writeln!(out, "static TABLE: RowCache<(), {dict_type}> = RowCache::new();")?;
    writeln!(out, "static CACHE: RowCache<{cache_key}, {ty}> = RowCache::new();")?;
    writeln!(out)?;

    writeln!(out, "/// One row of `{}`.", input.source_file)?;
    writeln!(out, "#[allow(non_camel_case_types)]")?;
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq)]")?;
    writeln!(out, "pub struct {ty} {{")?;
    for (ident, field_type) in idents.iter().zip(&types) {
        writeln!(out, "    pub {ident}: {},", field_type.rust_type())?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {ty} {{")?;
    writeln!(
        out,
        "    /// Returns the row whose `{}` is `key`, loading it on first use.",
        dict.key_field()
    )?;
    writeln!(out, "    pub fn get_instance({key_param}) -> Result<Arc<Self>, {error_type}> {{")?;
    writeln!(out, "        CACHE.get_or_try_insert_with({key_value}, || Self::load(key))")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    if int_key {
        writeln!(out, "    /// Caches a row that is not in the source file and returns its new key.")?;
        writeln!(out, "    pub fn add_row(row: Self) -> i64 {{")?;
        writeln!(out, "        CACHE.insert_next_id(CUSTOM_START, row)")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
    }
    writeln!(out, "    fn load({key_param}) -> Result<Self, {error_type}> {{")?;
    writeln!(out, "        let dict = TABLE.get_or_try_insert_with((), || {{")?;
    writeln!(out, "            let options = DictOptions::new({:?}, {key_index})", input.delimiter)?;
    writeln!(out, "                .with_source_name({:?});", input.source_file)?;
    if int_key {
        writeln!(out, "            CsvDict::from_reader_with_options(SOURCE.as_bytes(), options)")?;
        writeln!(out, "                .map_err(IntKeyError::from)")?;
        writeln!(out, "                .and_then(IntKeyCsvDict::new)")?;
    } else {
        writeln!(out, "            CsvDict::from_reader_with_options(SOURCE.as_bytes(), options)")?;
    }
    writeln!(out, "        }})?;")?;
    writeln!(out, "        Ok(Self {{")?;
    for (pos, (ident, field_type)) in idents.iter().zip(&types).enumerate() {
        let value = if pos == key_index {
            key_value.to_string()
        } else {
            match field_type {
                FieldType::Int => format!("dict.get_integer(key, {pos})?"),
                FieldType::Float => format!("dict.get_float(key, {pos})?"),
                FieldType::Text => format!("dict.get_string(key, {pos})?.to_string()"),
            }
        };
        writeln!(out, "            {ident}: {value},")?;
    }
    writeln!(out, "        }})")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")
}
