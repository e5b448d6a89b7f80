//! baymap - Bay Map Resolver
//!
//! Entry point for the baymap one-shot resolver.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use baymap::config::{Config, DEFAULT_CONFIG_PATH};
use baymap::correlate::Correlation;
use baymap::error::Result;
use baymap::pipeline;

/// Resolve RAID bays to Linux block devices and write the map artifact
#[derive(Parser, Debug)]
#[command(name = "baymap", version)]
struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Bay layout table (overrides config)
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,

    /// Output map path (overrides config)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Management tool binary (overrides config)
    #[arg(long, value_name = "PATH")]
    storcli: Option<PathBuf>,

    /// Treat a populated bay without a stable id as fatal
    #[arg(long)]
    strict: bool,

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

    info!("--- Starting baymap ---");

    match run(cli).await {
        Ok(outcome) => {
            if outcome.skipped.is_empty() {
                info!(mapped = outcome.map.len(), "bay map complete");
            } else {
                info!(
                    mapped = outcome.map.len(),
                    skipped = outcome.skipped.len(),
                    "bay map complete with bays excluded"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "bay map resolution failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Correlation> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(layout) = cli.layout {
        config.paths.layout = layout;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }
    if let Some(storcli) = cli.storcli {
        config.tool.storcli_bin = storcli;
    }
    config.validate()?;

    pipeline::run(&config, cli.strict).await
}
