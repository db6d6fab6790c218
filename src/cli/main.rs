//! data-modeller command line
//!
//! Infers a relational schema from a multi-table CSV file and writes it to a
//! DuckDB database, then prints the created tables and relationships.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use data_modeller::{
    ModellerConfig, ModellerError, ModellingSession, ReportExporter, ReportFormat, RerunPolicy,
    StoreTarget,
};

#[derive(Parser, Debug)]
#[command(name = "data-modeller", version, about = "Infer a relational schema from multi-table CSV text")]
struct Args {
    /// Input file: comma-separated tables separated by blank lines
    input: PathBuf,

    /// Database file to write (in-memory when omitted)
    #[arg(long)]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format (text, json, yaml)
    #[arg(long, default_value = "text")]
    format: ReportFormat,

    /// Fail instead of replacing tables that already exist
    #[arg(long)]
    reject_existing: bool,

    /// Print the DDL script instead of writing a database
    #[arg(long)]
    ddl_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ModellerError>() {
                Some(modeller) => eprintln!("Error ({} stage): {}", modeller.stage(), modeller.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ModellerConfig::from_toml_file(path).map_err(ModellerError::from)?,
        None => ModellerConfig::default(),
    };
    if args.reject_existing {
        config.rerun_policy = RerunPolicy::Reject;
    }

    let mut session = ModellingSession::new(config);
    session.load_file(&args.input)?;

    if args.ddl_only {
        print!("{}", session.ddl_script()?);
        return Ok(());
    }

    let target = match &args.db {
        Some(path) => StoreTarget::File(path.clone()),
        None => StoreTarget::Memory,
    };
    let report = session.materialize(&target)?;

    let rendered = ReportExporter::render(&report, args.format)
        .context("Failed to render run report")?;
    println!("{}", rendered.trim_end());
    Ok(())
}
