use anyhow::{bail, Context};
use clap::{Arg, Command};
use csvdict::codegen::{GenConfig, Generator};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let matches = Command::new("csvdict-gen")
        .about("Generate Rust row types from CSV files listed in a properties file")
        .arg(
            Arg::new("config")
                .help("Properties file: <file>.csv = <type path>,<key idx>,<int|String>[,...]")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("csv_dir")
                .help("Directory holding the CSV files")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("out_dir")
                .help("Directory the generated modules are written to")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(Arg::new("delim").long("delimiter").default_value(","))
        .get_matches();

    let config_path = matches
        .get_one::<PathBuf>("config")
        .context("config path is required")?;
    let csv_dir = matches
        .get_one::<PathBuf>("csv_dir")
        .context("CSV dir is required")?;
    let out_dir = matches
        .get_one::<PathBuf>("out_dir")
        .context("output dir is required")?;
    let delim = matches
        .get_one::<String>("delim")
        .context("delimiter is required")?;
    let mut chars = delim.chars();
    let delimiter = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => bail!("delimiter must be a single character, got {delim:?}"),
    };

    let config = GenConfig::from_path(config_path)?;
    info!(
        config = %config_path.display(),
        csv_dir = %csv_dir.display(),
        out_dir = %out_dir.display(),
        targets = config.target_count(),
        "generating sources"
    );

    let report = Generator::new(csv_dir, out_dir)
        .delimiter(delimiter)
        .run(&config);
    info!(
        generated = report.generated.len(),
        failed = report.failed.len(),
        "done"
    );
    if !report.is_success() {
        bail!(
            "{} of {} targets failed",
            report.failed.len(),
            config.target_count()
        );
    }
    Ok(())
}
