use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use csvdict::CsvDict;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("bench")
        .arg(Arg::new("path").long("path").value_parser(clap::value_parser!(PathBuf)).required(true))
        .arg(Arg::new("key-index").long("key-index").help("Zero-based key column").value_parser(clap::value_parser!(usize)).default_value("0"))
        .arg(Arg::new("delim").long("delimiter").default_value(","))
        .arg(Arg::new("fast-local").long("fast-local").help("Use mmap+parallel fast path for local uncompressed UTF-8 files (feature: fast_local)").action(ArgAction::SetTrue))
        .get_matches();

    let path = matches.get_one::<PathBuf>("path").context("--path is required")?;
    let key_index = *matches.get_one::<usize>("key-index").context("--key-index")?;
    let delimiter = matches
        .get_one::<String>("delim")
        .and_then(|d| d.chars().next())
        .context("--delimiter must not be empty")?;

    let start = Instant::now();
    let dict = load(path, delimiter, key_index, matches.get_flag("fast-local")).await?;
    let load_secs = start.elapsed().as_secs_f64();

    // one typed read per row, all keys
    let start = Instant::now();
    let mut hits = 0usize;
    for key in dict.keys() {
        if !dict.get_float(key, key_index)?.is_nan() {
            hits += 1;
        }
    }
    let lookup_secs = start.elapsed().as_secs_f64();

    let rows = dict.row_count() as f64;
    println!(
        "source={} rows={} fields={:?} crc=0x{:08x}\nload={:.3}s rows/sec={:.0}\nlookups={:.3}s numeric_keys={} lookups/sec={:.0}",
        path.display(),
        dict.row_count(),
        dict.field_names(),
        dict.fingerprint(),
        load_secs,
        rows / load_secs,
        lookup_secs,
        hits,
        rows / lookup_secs
    );
    Ok(())
}

async fn load(
    path: &Path,
    delimiter: char,
    key_index: usize,
    fast_local: bool,
) -> anyhow::Result<CsvDict> {
    #[cfg(feature = "fast_local")]
    if fast_local && path.extension().and_then(|s| s.to_str()) == Some("csv") {
        return Ok(csvdict::fast_local_load(path, delimiter, key_index)?);
    }
    #[cfg(not(feature = "fast_local"))]
    if fast_local {
        anyhow::bail!("--fast-local needs the fast_local feature");
    }
    Ok(CsvDict::open(path, delimiter, key_index).await?)
}
