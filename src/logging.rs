//! Logging initialization for the dealflow core.
//!
//! File mode: logs to `{state}/logs/dealflow-{datetime}.log`
//! Otherwise: logs to stderr

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set when file logging is enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging based on configuration.
///
/// # Arguments
/// * `config` - Application configuration
/// * `debug_override` - If true, override log level to "debug" (from --debug flag)
///
/// # Returns
/// A `LoggingHandle` that must be kept alive for the duration of the program.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let log_level = if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(log_level));

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        // Generate log filename with ISO8601 timestamp
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let log_filename = format!("dealflow-{}.log", timestamp);
        let log_file_path = logs_dir.join(&log_filename);

        // Create file appender
        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        // File logging disabled: log to stderr
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
