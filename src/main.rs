//! Racketeer - throttled automation agent for the Mobsteria browser game.
//!
//! Main entry point for the Racketeer CLI.

mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use racketeer_config::{ConfigLoader, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Get the .racketeer directory path.
fn racketeer_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".racketeer"))
        .unwrap_or_else(|| PathBuf::from(".racketeer"))
}

/// Initialize tracing with console and file output.
///
/// Log files rotate daily in `[logging].log_dir`. `RUST_LOG` overrides the
/// configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = if logging.log_dir.trim().is_empty() {
        racketeer_dir().join("logs")
    } else {
        PathBuf::from(ConfigLoader::expand_path(&logging.log_dir))
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("racketeer")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the whole program
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    debug!("Logging to {}", log_dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;

    match cli.command {
        None => commands::run(config, false, false, false).await,
        Some(Commands::Run {
            bust,
            trainer,
            crimes,
        }) => commands::run(config, bust, trainer, crimes).await,
        Some(Commands::Check) => commands::check(&config),
        Some(Commands::Fetch) => commands::fetch(config).await,
        Some(Commands::Train { stat }) => commands::train(config, stat).await,
        Some(Commands::Act { kind, id }) => commands::act(config, kind, id).await,
    }
}
