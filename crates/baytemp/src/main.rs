//! baytemp - Drive Temperature Exporter
//!
//! Entry point for the baytemp one-shot exporter.

use std::path::PathBuf;
use std::process::ExitCode;

use baymap_common::mapfile::{self, MapFileError};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use baytemp::config::{Config, DEFAULT_CONFIG_PATH};
use baytemp::error::{BaytempError, Result};
use baytemp::{hddtemp, textfile};

/// Probe drive temperatures for every mapped bay and publish a textfile
#[derive(Parser, Debug)]
#[command(name = "baytemp", version)]
struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Bay map artifact (overrides config)
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Textfile collector directory (overrides config)
    #[arg(long, value_name = "PATH")]
    textfile_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Initializes tracing/logging subsystem
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("--- Starting baytemp ---");

    match run(cli).await {
        Ok(path) => {
            info!(path = %path.display(), "textfile published");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "temperature export failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<PathBuf> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(map) = cli.map {
        config.paths.map = map;
    }
    if let Some(dir) = cli.textfile_dir {
        config.paths.textfile_dir = dir;
    }
    config.validate()?;

    let map = match mapfile::read(&config.paths.map) {
        Ok(map) => map,
        Err(MapFileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BaytempError::config(format!(
                "bay map '{}' does not exist; run baymap first",
                config.paths.map.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    info!(bays = map.len(), map = %config.paths.map.display(), "loaded bay map");

    let samples = hddtemp::collect(&config.tool.hddtemp_bin, &config.paths.by_id_dir, &map).await;
    let unknown = samples.iter().filter(|s| s.celsius.is_none()).count();
    if unknown > 0 {
        warn!(unknown, "some drives did not answer the temperature probe");
    }

    textfile::write(&config.paths.textfile_dir, &textfile::render(&samples))
}
