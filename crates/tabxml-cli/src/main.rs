use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tabxml",
    version,
    about = "Generate one XML document per row of a delimited metadata table"
)]
struct Args {
    /// XML template file carrying the prolog and the base tree
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,
    /// Mapping file (';'-separated, headers + one row of fragments)
    #[arg(value_name = "MAPPING")]
    mapping: PathBuf,
    /// Data file (';'-separated, headers + one row per document)
    #[arg(value_name = "DATA")]
    data: PathBuf,
    /// Directory the generated documents are written into (must exist)
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,
    /// Header of the column whose value names each output file
    #[arg(value_name = "NAME_COLUMN")]
    name_column: String,
    /// Report data columns that have no mapping entry
    #[arg(short, long)]
    verbose: bool,
    /// Keep first-level elements that end up empty
    #[arg(short = 'k', long)]
    keep_empty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let args = Args::parse();

    for path in [&args.template, &args.mapping, &args.data] {
        if !path.is_file() {
            bail!("the file {} does not exist", path.display());
        }
    }
    if !args.out_dir.is_dir() {
        bail!("the folder {} does not exist", args.out_dir.display());
    }

    let mut options = tabxml::Options::new(
        args.template.clone(),
        args.mapping.clone(),
        args.data.clone(),
        args.out_dir.clone(),
        args.name_column.clone(),
    );
    options.verbose = args.verbose;
    options.prune_empty = !args.keep_empty;

    tabxml::run(&options)?;
    Ok(())
}
