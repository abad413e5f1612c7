use crate::codec::Utf8Transcoder;
use crate::dict::{CsvDict, DictLoader, DictOptions};
use crate::{DictError, DictResult};
use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use futures::TryStreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

#[derive(Debug, Clone)]
pub struct CsvMeta {
    /// e.g. "application/gzip" or "text/csv"
    pub content_type: String,
    /// e.g. "gzip", "zstd", or empty
    pub content_encoding: String,
    /// file or object name, used for extension fallback and error messages
    pub name_hint: String,
    /// Which character encoding to expect (defaults to UTF-8)
    pub charset: &'static encoding_rs::Encoding,
}

impl Default for CsvMeta {
    fn default() -> Self {
        Self {
            content_type: String::new(),
            content_encoding: String::new(),
            name_hint: String::new(),
            charset: encoding_rs::UTF_8,
        }
    }
}

impl CsvMeta {
    /// Guesses compression from a file name's extension.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name_hint = name.into();
        let (content_type, content_encoding) = match name_hint.rsplit('.').next() {
            Some("gz") => ("application/gzip", "gzip"),
            Some("zst") => ("application/zstd", "zstd"),
            _ => ("text/csv", ""),
        };
        Self {
            content_type: content_type.into(),
            content_encoding: content_encoding.into(),
            name_hint,
            ..Default::default()
        }
    }

    fn is_gzip(&self) -> bool {
        let ct = self.content_type.to_ascii_lowercase();
        has_encoding(&self.content_encoding, "gzip")
            || matches!(ct.as_str(), "application/gzip" | "application/x-gzip")
            || self.name_hint.ends_with(".gz")
    }

    fn is_zstd(&self) -> bool {
        has_encoding(&self.content_encoding, "zstd")
            || self.content_type.eq_ignore_ascii_case("application/zstd")
            || self.name_hint.ends_with(".zst")
    }
}

fn has_encoding(list: &str, wanted: &str) -> bool {
    list.split(',').any(|s| s.trim().eq_ignore_ascii_case(wanted))
}

/// Wraps a raw stream with decompression (encoding -> type -> extension) and,
/// for non-UTF-8 charsets, transcoding to UTF-8.
pub fn build_csv_reader<R>(raw: R, meta: CsvMeta) -> (impl AsyncRead + Unpin + Send, CsvMeta)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf = BufReader::with_capacity(1 << 20, raw);
    let decompressed: Box<dyn AsyncRead + Unpin + Send> = if meta.is_gzip() {
        Box::new(GzipDecoder::new(buf))
    } else if meta.is_zstd() {
        Box::new(ZstdDecoder::new(buf))
    } else {
        Box::new(buf)
    };

    let reader: Box<dyn AsyncRead + Unpin + Send> = if meta.charset == encoding_rs::UTF_8 {
        decompressed
    } else {
        let framed = FramedRead::new(decompressed, Utf8Transcoder::new(meta.charset));
        Box::new(StreamReader::new(framed))
    };

    (reader, meta)
}

/// Opens a local file, with compression guessed from its extension.
pub async fn reader_from_path(path: &Path) -> DictResult<(impl AsyncRead + Unpin + Send, CsvMeta)> {
    let file = File::open(path).await.map_err(|source| DictError::Io {
        source_name: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Ok(build_csv_reader(file, CsvMeta::from_name(name)))
}

impl CsvDict {
    /// Loads a local file that may be gzip (`.gz`) or zstd (`.zst`) compressed.
    pub async fn open(path: impl AsRef<Path>, delimiter: char, key_index: usize) -> DictResult<Self> {
        let path = path.as_ref();
        let (reader, _meta) = reader_from_path(path).await?;
        let options =
            DictOptions::new(delimiter, key_index).with_source_name(path.display().to_string());
        load_async(reader, options).await
    }

    /// Loads from any async byte stream, decoded as `meta` describes.
    pub async fn from_async_reader<R>(raw: R, meta: CsvMeta, options: DictOptions) -> DictResult<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (reader, _meta) = build_csv_reader(raw, meta);
        load_async(reader, options).await
    }
}

async fn load_async<R>(reader: R, options: DictOptions) -> DictResult<CsvDict>
where
    R: AsyncRead + Unpin,
{
    let source_name = options.source_name.clone();
    let mut lines = FramedRead::new(reader, LinesCodec::new());
    let mut loader = DictLoader::new(options);
    while let Some(line) = lines.try_next().await.map_err(|source| DictError::Decode {
        source_name: source_name.clone(),
        source,
    })? {
        loader.push_line(&line)?;
    }
    loader.finish()
}
