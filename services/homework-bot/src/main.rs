//! Homework bot CLI
//!
//! Command-line entry point for the homework review status notifier.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use homework_bot::{load_config, Config};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Homework review status notifier for Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (overrides config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "debug")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(config_path) => load_config(config_path)?,
        None => Config::default(),
    };

    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }

    init_logging(&config.log_file, args.log_level)?;

    tracing::debug!(
        "Parsed command line arguments: config={:?}, log_file={:?}, log_level={:?}",
        args.config,
        args.log_file,
        args.log_level
    );

    config.resolve_secrets();

    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting homework bot");
    tracing::debug!("Settings: {:?}", settings);

    homework_bot::run(settings).await?;

    Ok(())
}

/// Log to stdout and to `log_file`, each line with time, source location and level
fn init_logging(log_file: &Path, level: Level) -> homework_bot::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(())
}
