//! Logging setup and the logging capability handed to the dump orchestrator.
//!
//! Standard output carries the dump itself, so every log line goes to stderr.

use crate::Result;

/// Logging capability used by the orchestrator.
///
/// The orchestrator receives this explicitly instead of reaching for
/// process-wide logger state, so tests can capture what it reports.
pub trait DumpLogger: Send + Sync {
    /// Reports normal progress.
    fn info(&self, message: &str);

    /// Reports a failure.
    fn error(&self, message: &str);
}

/// `DumpLogger` that forwards to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl DumpLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Maps CLI verbosity flags onto a log level.
///
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging on stderr based on verbosity level.
///
/// # Example
/// ```rust,no_run
/// use dbdump_core::logging::init_logging;
///
/// // Initialize at DEBUG level
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::DbDumpError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}
