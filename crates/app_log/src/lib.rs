//! PocketFiler Logging & Observability Module
//!
//! Provides structured logging, panic handling and crash reports.

mod panic_hook;
mod logging;

pub use panic_hook::{init_panic_hook, payload_message, CrashReport};
pub use logging::{init_logging, cleanup_old_logs, cleanup_logs_in, LOG_FILE_PREFIX};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::path::PathBuf;
use directories::ProjectDirs;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "PocketFiler", "PocketFiler")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features.
///
/// The returned guard flushes the log file when dropped; hold it for the
/// lifetime of the process.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let guard = init_logging()?;
    init_panic_hook();
    Ok(guard)
}
