//! Generates Rust row types over CSV files.
//!
//! Each generated type holds one row as typed public fields, is built
//! through a per-type [`RowCache`](crate::RowCache) keyed by row key, and
//! reads its data from the CSV embedded with `include_str!`. Field types are
//! inferred from the column contents (see [`infer_field_types`]).

mod config;
mod ident;
mod render;

pub use config::{CsvEntry, GenConfig, KeyKind, Target};
pub use ident::{field_ident, field_idents, snake_case, split_type_path};
pub use render::{infer_field_types, render_module, FieldType, RenderInput, CUSTOM_START};

use crate::{CsvDict, DictError, IntKeyCsvDict, IntKeyError};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum GenError {
    #[error("config line {line}: {message}")]
    Config { line: usize, message: String },
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error(transparent)]
    IntKey(#[from] IntKeyError),
}

/// Outcome of a whole config run.
#[derive(Debug, Default)]
pub struct GenReport {
    pub generated: Vec<PathBuf>,
    pub failed: Vec<(String, GenError)>,
}

impl GenReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    csv_dir: PathBuf,
    out_dir: PathBuf,
    delimiter: char,
}

impl Generator {
    pub fn new(csv_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            out_dir: out_dir.into(),
            delimiter: ',',
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Generates every target in `config`. A failing target is logged and
    /// recorded; the rest still run.
    pub fn run(&self, config: &GenConfig) -> GenReport {
        let mut report = GenReport::default();
        for entry in &config.entries {
            for target in &entry.targets {
                match self.generate(&entry.file, target) {
                    Ok(path) => {
                        info!(file = %entry.file, target = %target.type_path, out = %path.display(), "generated");
                        report.generated.push(path);
                    }
                    Err(e) => {
                        error!(file = %entry.file, target = %target.type_path, error = %e, "generation failed");
                        report.failed.push((target.type_path.clone(), e));
                    }
                }
            }
        }
        report
    }

    /// Writes the module for one target and returns its path.
    pub fn generate(&self, file: &str, target: &Target) -> Result<PathBuf, GenError> {
        let source = self.render(file, target)?;
        let out_path = self.output_path(target);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&out_path, source).map_err(|source| GenError::Io {
            path: out_path.clone(),
            source,
        })?;
        Ok(out_path)
    }

    /// Module source for one target, without writing it.
    pub fn render(&self, file: &str, target: &Target) -> Result<String, GenError> {
        let csv_path = self.csv_dir.join(file);
        let dict = load_for(&csv_path, self.delimiter, target)?;
        let out_path = self.output_path(target);
        let module_dir = out_path.parent().unwrap_or(self.out_dir.as_path());
        let include_path = relative_include(&csv_path, module_dir)?;
        let (_, type_name) = split_type_path(&target.type_path);
        Ok(render_module(&RenderInput {
            dict: &dict,
            type_name: &type_name,
            key_kind: target.key_kind,
            source_file: file,
            include_path: &include_path,
            delimiter: self.delimiter,
        }))
    }

    /// `<out>/<module dirs>/<snake_case type>.rs`
    pub fn output_path(&self, target: &Target) -> PathBuf {
        let (modules, type_name) = split_type_path(&target.type_path);
        let mut path = self.out_dir.clone();
        path.extend(modules);
        path.push(format!("{}.rs", field_ident(&type_name)));
        path
    }
}

/// `csv` relative to `module_dir`, `/`-separated, so the generated
/// `include_str!` keeps resolving wherever the tree is checked out.
/// Falls back to the absolute path when the two share no root.
fn relative_include(csv: &Path, module_dir: &Path) -> Result<String, GenError> {
    let absolute = |path: &Path| {
        std::path::absolute(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })
    };
    let csv = absolute(csv)?;
    let module_dir = absolute(module_dir)?;
    let to = normal_components(&csv);
    let from = normal_components(&module_dir);

    let common = to.iter().zip(&from).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return Ok(csv.to_string_lossy().into_owned());
    }
    let mut parts = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(parts.join("/"))
}

/// Lexically drops `.` and folds `dir/..` pairs.
fn normal_components(path: &Path) -> Vec<Component<'_>> {
    let mut out = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Integer-keyed targets go through [`IntKeyCsvDict`] so a bad key column
/// fails here instead of in the generated code.
fn load_for(path: &Path, delimiter: char, target: &Target) -> Result<CsvDict, GenError> {
    Ok(match target.key_kind {
        KeyKind::Int => IntKeyCsvDict::from_path(path, delimiter, target.key_index)?.into_inner(),
        KeyKind::Text => CsvDict::from_path(path, delimiter, target.key_index)?,
    })
}
