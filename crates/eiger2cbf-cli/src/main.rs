mod progress;
mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use eiger2cbf_core::io::container::ContainerReader;
use eiger2cbf_core::pipeline::config::ConversionConfig;
use eiger2cbf_core::pipeline::{run_conversion_reported, ProgressReporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::progress::BarReporter;

#[derive(Parser)]
#[command(name = "eiger2cbf", about = "EIGER HDF5 to CBF converter")]
#[command(version, disable_help_flag = true)]
struct Cli {
    /// First frame to convert (1-based)
    #[arg(short = 's', long = "start")]
    start: Option<u64>,

    /// Last frame to convert (inclusive)
    #[arg(short = 'e', long = "end")]
    end: Option<u64>,

    /// Output file prefix (default: master file name up to "master.")
    #[arg(short = 'p', long)]
    prefix: Option<String>,

    /// Disable renumbering of output files by rotation angle
    #[arg(short = 'x', long = "no-renumber")]
    no_renumber: bool,

    /// Number of frames converted concurrently
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Conversion config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print usage and exit
    #[arg(short = 'h', long = "help")]
    help: bool,

    /// EIGER master file
    master_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.help {
        print_usage();
        return ExitCode::FAILURE;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let usage = Cli::command().render_help();
    eprintln!("{usage}");
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let Some(master_file) = cli.master_file.as_deref().filter(|p| p.exists()) else {
        print_usage();
        return Ok(ExitCode::FAILURE);
    };

    info!(master_file = %master_file.display(), "EIGER HDF5 to CBF converter");
    let config = build_config(cli, master_file)?;
    summary::print_run_header(&config);

    let reader = open_container(master_file)?;
    let reporter: Arc<dyn ProgressReporter> = Arc::new(BarReporter::new());
    let result = run_conversion_reported(reader.as_ref(), &config, reporter)
        .with_context(|| format!("Failed to convert {}", master_file.display()))?;

    summary::print_run_summary(&result);

    if result.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Merge the optional config file with command-line flags; flags win.
fn build_config(cli: &Cli, master_file: &Path) -> Result<ConversionConfig> {
    let mut config = if let Some(ref config_path) = cli.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid conversion config")?
    } else {
        ConversionConfig::default()
    };

    config.input = master_file.to_path_buf();
    if cli.start.is_some() {
        config.first_frame = cli.start;
    }
    if cli.end.is_some() {
        config.last_frame = cli.end;
    }
    if cli.prefix.is_some() {
        config.prefix = cli.prefix.clone();
    }
    if cli.no_renumber {
        config.renumber = false;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    Ok(config)
}

#[cfg(feature = "hdf5")]
fn open_container(path: &Path) -> Result<Box<dyn ContainerReader>> {
    let container = eiger2cbf_core::io::hdf5::Hdf5Container::open(path)?;
    Ok(Box::new(container))
}

#[cfg(not(feature = "hdf5"))]
fn open_container(path: &Path) -> Result<Box<dyn ContainerReader>> {
    anyhow::bail!(
        "cannot read {}: eiger2cbf was built without HDF5 support (rebuild with --features hdf5)",
        path.display()
    )
}
