//! baybench - Benchmark Metrics Ingester
//!
//! Entry point for the baybench pipe-through ingester.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use baybench::config::{self, Config};
use baybench::error::Result;
use baybench::ingest::{self, SessionReport};
use baybench::sink::Sink;

/// Echo swift-bench output through and post its readings to a metrics sink
#[derive(Parser, Debug)]
#[command(name = "baybench", version)]
struct Cli {
    /// Sink config file (defaults to ~/.config/elasticsearch.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Extra-info files merged into every document (JSON or key=value)
    #[arg(value_name = "EXTRA_FILE")]
    extra: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Initializes tracing/logging subsystem. Logs go to stderr; stdout
/// belongs to the pipe.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("--- Starting baybench ---");

    match run(cli).await {
        Ok(report) => {
            info!(
                posted = report.posted,
                failed = report.failed,
                "bench session complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "bench ingestion failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<SessionReport> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    config.validate()?;
    info!(sink = %config.url, config = %config_path.display(), "sink configured");

    let extra = config::load_extra_info(&cli.extra)?;
    let sink = Sink::new(&config, extra);

    let input = BufReader::new(tokio::io::stdin());
    let mut echo = std::io::stdout();
    ingest::run_session(&sink, input, &mut echo).await
}
