// Logging - flexi_logger writing daily-rotated files
//
// The TUI owns the terminal, so log output never goes to stdout/stderr.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use flexi_logger::{Age, Cleanup, Criterion, DeferredNow, FileSpec, Logger, LoggerHandle, Naming, Record};
use std::io::Write;

pub const LOG_BASENAME: &str = "mini-crm";

/// Days of rotated log files kept on disk
pub const KEEP_LOG_FILES: usize = 7;

/// `[2024-01-15 10:30:00] INFO [mini_crm::store] message`
pub fn log_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "[{}] {} [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        record.args()
    )
}

/// Start the global logger. Keep the returned handle alive for the
/// lifetime of the program or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(&config.level)
        .with_context(|| format!("invalid log level: {}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(&config.directory)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .format(log_format)
        .start()
        .context("failed to start logger")?;

    Ok(handle)
}
