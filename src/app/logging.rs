use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEBUG_LOG_FILE: &str = "playme_debug.log";
pub const ERROR_LOG_FILE: &str = "playme_error.log";

/// Keeps the background log writers alive; drop it last.
pub struct LogGuards {
    _debug: WorkerGuard,
    _error: WorkerGuard,
}

/// Append everything to the debug log and errors alone to the error log.
///
/// `RUST_LOG` overrides the default `playme=debug` filter.
pub fn init(log_dir: &Path) -> Result<LogGuards> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let (debug_writer, debug_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, DEBUG_LOG_FILE));
    let (error_writer, error_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, ERROR_LOG_FILE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "playme=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(debug_writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(error_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuards {
        _debug: debug_guard,
        _error: error_guard,
    })
}
