//! Application error types

use app_fs::{FileOpError, FsError};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (status message, continue) =====
    #[error("Cannot open {path}: {source}")]
    ScanFailure {
        path: String,
        #[source]
        source: FsError,
    },

    #[error("{0}")]
    Operation(#[from] FileOpError),

    #[error("Nothing selected")]
    NoSelection,

    #[error("Clipboard is empty")]
    NothingToPaste,

    #[error("Not allowed on the parent folder")]
    ParentEntry,

    // ===== Fatal Errors (application termination) =====
    #[error("System resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn scan_failure(path: impl Into<String>, source: FsError) -> Self {
        match source {
            FsError::ResourceExhausted(p) => AppError::ResourceExhaustion(p),
            source => AppError::ScanFailure {
                path: path.into(),
                source,
            },
        }
    }

    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::ScanFailure { .. }
                | AppError::Operation(_)
                | AppError::NoSelection
                | AppError::NothingToPaste
                | AppError::ParentEntry
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::ScanFailure { source, .. } => match source {
                FsError::AccessDenied(path) => format!("Access denied: {}", path),
                FsError::NotFound(path) => format!("Folder not found: {}", path),
                other => format!("Cannot open folder: {}", other),
            },
            AppError::Operation(FileOpError::Fs(FsError::Os { source, .. })) => {
                format!("Failed: {}", source)
            }
            AppError::NoSelection => "Select an item first".to_string(),
            AppError::NothingToPaste => "Nothing to paste".to_string(),
            _ => self.to_string(),
        }
    }
}
