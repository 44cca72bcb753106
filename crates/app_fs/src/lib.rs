//! PocketFiler File System Abstraction Layer
//!
//! Provides the filesystem-facing half of the file manager:
//! - FileSystem: the service trait the core talks to (scan, chdir, remove)
//! - StdFileSystem / MemoryFileSystem implementations
//! - Directory scanning into a sorted Listing
//! - File operations (delete, with paste/rename acknowledged but unimplemented)

mod entry;
mod service;
mod memory;
mod scanner;
mod file_operations;

pub use entry::{DirEntry, Listing};
pub use service::{FileSystem, StdFileSystem};
pub use memory::MemoryFileSystem;
pub use scanner::{scan, compare_entries, is_listed, PARENT_ENTRY};
pub use file_operations::{ClipboardMode, FileOpError, FileOpsExecutor};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{op} failed on {path}: {source}")]
    Os {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Out of memory while listing {0}")]
    ResourceExhausted(String),
}

impl FsError {
    /// Wrap an OS-level failure, keeping the raw error for its code and description
    pub fn os(op: &'static str, path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FsError::Os {
            op,
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Raw OS error code, when the failure came from the OS
    pub fn os_code(&self) -> Option<i32> {
        match self {
            FsError::Io(e) => e.raw_os_error(),
            FsError::Os { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
