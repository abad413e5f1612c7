use crate::dict::{CsvDict, DictLoader, DictOptions};
use crate::split::{is_skippable, split_quoted};
use crate::{DictError, DictResult};
use memchr::{memchr, memchr_iter};
use memmap2::MmapOptions;
use std::fs::File;
use std::io;
use std::path::Path;
use std::thread;

/// Loads an uncompressed local UTF-8 file through a memory map, splitting
/// data lines in parallel chunks.
///
/// Rows are inserted in file order after splitting, so the result matches
/// [`CsvDict::from_path`] exactly. Assumes no embedded newlines in quoted
/// fields.
pub fn fast_local_load(path: &Path, delimiter: char, key_index: usize) -> DictResult<CsvDict> {
    let source_name = path.display().to_string();
    let io_err = |source: io::Error| DictError::Io {
        source_name: source_name.clone(),
        source,
    };
    let options = DictOptions::new(delimiter, key_index).with_source_name(source_name.clone());
    let mut loader = DictLoader::new(options);

    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len() as usize;
    if len == 0 {
        return loader.finish();
    }
    // SAFETY: the map is read-only and dropped before returning; the file
    // must not be truncated by another process meanwhile.
    let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(io_err)?;
    let text = std::str::from_utf8(&mmap[..])
        .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    let bytes = text.as_bytes();

    // header: first non-comment line
    let mut body_start = 0usize;
    while body_start < len && !loader.has_header() {
        let end = memchr(b'\n', &bytes[body_start..]).map_or(len, |off| body_start + off);
        loader.push_line(strip_cr(&text[body_start..end]))?;
        body_start = (end + 1).min(len);
    }

    // chunk the body on line boundaries, one chunk per core
    let cores = num_cpus::get().max(1);
    let approx = (len - body_start) / cores;
    let mut starts = Vec::with_capacity(cores + 1);
    starts.push(body_start);
    let mut pos = body_start + approx;
    while starts.len() < cores && approx > 0 && pos < len {
        let next = memchr(b'\n', &bytes[pos..]).map_or(len, |off| pos + off + 1);
        starts.push(next);
        pos = next.max(body_start + starts.len() * approx);
    }
    starts.push(len);
    starts.dedup();

    let chunks: Vec<Vec<Vec<String>>> = thread::scope(|s| {
        let handles: Vec<_> = starts
            .windows(2)
            .map(|w| {
                let chunk = &text[w[0]..w[1]];
                s.spawn(move || split_chunk(chunk, delimiter))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    for rows in chunks {
        for cells in rows {
            loader.push_cells(cells)?;
        }
    }
    loader.finish()
}

fn split_chunk(chunk: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut cursor = 0usize;
    let mut take = |line: &str| {
        let line = strip_cr(line);
        if !is_skippable(line) {
            rows.push(split_quoted(line, delimiter));
        }
    };
    for nl in memchr_iter(b'\n', chunk.as_bytes()) {
        take(&chunk[cursor..nl]);
        cursor = nl + 1;
    }
    if cursor < chunk.len() {
        take(&chunk[cursor..]);
    }
    rows
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
