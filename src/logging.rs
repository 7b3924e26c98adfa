//! Logging configuration using the tracing framework
//!
//! Logs are filtered through the RUST_LOG environment variable. The terminal UI owns
//! stdout, so interactive sessions log to a rolling file instead.

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "agenda=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging to stderr for the non-interactive subcommands
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level (e.g., "debug", "info", "warn", "error")
///   - Default: "agenda=info,warn"
///   - Examples:
///     - `RUST_LOG=agenda=debug` - Debug logs for this crate
///     - `RUST_LOG=agenda::directory=trace` - Trace the activity directory client
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

/// Directory holding the rolling log files
pub fn log_directory() -> std::io::Result<PathBuf> {
    match directories::ProjectDirs::from("com", "agenda", "agenda") {
        Some(proj_dirs) => {
            let log_path = proj_dirs.data_dir().join("logs");
            std::fs::create_dir_all(&log_path)?;
            Ok(log_path)
        }
        None => std::env::current_dir(),
    }
}

/// Initialize logging to a daily rolling file only
///
/// Used while the terminal UI is active.
///
/// ```no_run
/// agenda::logging::init_with_file("agenda.log").expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_with_file(log_file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_directory()?, log_file_name);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(())
}

/// Initialize logging for tests
///
/// Only errors are shown unless RUST_LOG says otherwise.
pub fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok(); // Ignore errors if already initialized
}
