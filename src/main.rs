use anyhow::Result;
use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::terminal::{disable_raw_mode, LeaveAlternateScreen};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revise::cli::Cli;

#[tokio::main]
async fn main() {
    // Set up panic hook for graceful error recovery
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file; reported once logging is up
    let dotenv = dotenvy::dotenv();

    // Execute CLI command
    if let Err(e) = execute(dotenv).await {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr, or to `log_file` while the terminal UI owns the screen.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if debug { "revise=debug" } else { "revise=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    let (result, guard) = match log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let file_appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let result = registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .try_init();
            (result, Some(guard))
        }
        None => {
            let result = registry
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .try_init();
            (result, None)
        }
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(guard)
}

async fn execute(dotenv: dotenvy::Result<PathBuf>) -> Result<()> {
    let cli = Cli::parse();

    // The log file lives in the configured data directory, so stderr
    // carries any failure to load the configuration itself
    let config = match cli.load_config().await {
        Ok(config) => config,
        Err(e) => {
            let _log_guard = init_logging(cli.debug, None)?;
            return Err(e);
        }
    };

    let log_file = config.log_file();
    let _log_guard = init_logging(cli.debug, cli.is_interactive().then_some(log_file.as_path()))?;

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file found or error loading it: {}", e),
    }
    debug!("{}", config.describe_source());

    cli.execute(config).await
}
