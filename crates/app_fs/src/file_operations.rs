//! File operations module
//! Delete is performed; paste (copy/move) and rename are acknowledged but
//! not implemented and say so instead of silently succeeding.

use crate::{DirEntry, FileSystem, FsError, Listing};
use std::path::Path;
use thiserror::Error;

/// File operation errors
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("{0}")]
    Fs(#[from] FsError),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl FileOpError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, FileOpError::NotImplemented(_))
    }
}

pub type Result<T> = std::result::Result<T, FileOpError>;

/// Clipboard operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

impl ClipboardMode {
    pub fn label(self) -> &'static str {
        match self {
            ClipboardMode::Copy => "Copy",
            ClipboardMode::Cut => "Move",
        }
    }
}

/// Runs file operations against a filesystem and keeps the listing in step
pub struct FileOpsExecutor<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
}

impl<'a, F: FileSystem + ?Sized> FileOpsExecutor<'a, F> {
    pub fn new(fs: &'a mut F) -> Self {
        Self { fs }
    }

    /// Delete the entry at `index` of the listing for the working directory.
    ///
    /// On success the entry is removed from `listing` in place (no rescan).
    /// On failure `listing` is left untouched.
    pub fn delete(&mut self, listing: &mut Listing, index: usize) -> Result<DirEntry> {
        let entry = listing
            .get(index)
            .ok_or_else(|| FileOpError::InvalidOperation(format!("no entry at index {}", index)))?;

        if entry.is_parent() {
            return Err(FileOpError::InvalidOperation(
                "cannot delete the parent directory entry".to_string(),
            ));
        }

        let path = self.fs.resolve(Path::new(&entry.name));
        self.fs.remove(&path)?;

        let removed = listing
            .remove_at(index)
            .ok_or_else(|| FileOpError::InvalidOperation(format!("no entry at index {}", index)))?;
        tracing::info!("Deleted: {}", path.display());
        Ok(removed)
    }

    /// Paste `source` into `target_dir`
    pub fn paste(&mut self, mode: ClipboardMode, source: &Path, target_dir: &Path) -> Result<()> {
        tracing::warn!(
            "{} {} -> {} requested, not implemented",
            mode.label(),
            source.display(),
            target_dir.display()
        );
        Err(FileOpError::NotImplemented(mode.label()))
    }

    /// Rename `path` within its directory
    pub fn rename(&mut self, path: &Path) -> Result<()> {
        tracing::warn!("Rename of {} requested, not implemented", path.display());
        Err(FileOpError::NotImplemented("Rename"))
    }
}
