//! Filesystem service consumed by the core

use crate::{DirEntry, FsError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Filesystem operations the file manager needs.
///
/// Relative paths are resolved against [`FileSystem::current_dir`].
pub trait FileSystem {
    /// Raw entries of a directory, unfiltered and unsorted.
    ///
    /// Includes the `..` entry when the directory has a parent.
    fn scan_directory(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Make `path` the working directory
    fn change_directory(&mut self, path: &Path) -> Result<()>;

    /// Remove a file, or a directory with everything below it
    fn remove(&mut self, path: &Path) -> Result<()>;

    /// Absolute working directory
    fn current_dir(&self) -> PathBuf;

    /// Resolve `path` against the working directory
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir().join(path)
        }
    }
}

/// Filesystem backed by `std::fs`.
///
/// Tracks its own working directory instead of changing the process one.
#[derive(Debug, Clone)]
pub struct StdFileSystem {
    cwd: PathBuf,
}

impl StdFileSystem {
    /// Start in `start`, which must be an existing directory
    pub fn new<P: AsRef<Path>>(start: P) -> Result<Self> {
        let cwd = canonical_dir(start.as_ref())?;
        tracing::debug!("Filesystem rooted at {}", cwd.display());
        Ok(Self { cwd })
    }

    /// Start in the process working directory
    pub fn from_process_cwd() -> Result<Self> {
        Self::new(std::env::current_dir()?)
    }
}

impl FileSystem for StdFileSystem {
    fn scan_directory(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let dir = self.resolve(path);
        let read_dir = fs::read_dir(&dir).map_err(|e| classify("scan", &dir, e))?;

        let mut entries = Vec::new();
        if dir.parent().is_some() {
            entries.push(DirEntry::parent());
        }

        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            // Follow symlinks so a link to a folder behaves like a folder
            let metadata = match fs::metadata(entry.path()).or_else(|_| entry.metadata()) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            entries.push(if metadata.is_dir() {
                DirEntry::dir(name)
            } else {
                DirEntry::file(name, metadata.len())
            });
        }

        Ok(entries)
    }

    fn change_directory(&mut self, path: &Path) -> Result<()> {
        let target = canonical_dir(&self.resolve(path))?;
        tracing::debug!("chdir {} -> {}", self.cwd.display(), target.display());
        self.cwd = target;
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        let metadata =
            fs::symlink_metadata(&target).map_err(|e| FsError::os("remove", &target, e))?;

        if metadata.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        }
        .map_err(|e| FsError::os("remove", &target, e))?;

        tracing::warn!("Permanently deleted: {}", target.display());
        Ok(())
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path.canonicalize().map_err(|e| classify("chdir", path, e))?;
    if !canonical.is_dir() {
        return Err(FsError::NotADirectory(canonical.display().to_string()));
    }
    Ok(canonical)
}

fn classify(op: &'static str, path: &Path, err: std::io::Error) -> FsError {
    match err.kind() {
        ErrorKind::NotFound => FsError::NotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => FsError::AccessDenied(path.display().to_string()),
        _ => FsError::os(op, path, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_reports_parent_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let fs_service = StdFileSystem::new(dir.path()).unwrap();
        let mut entries = fs_service.scan_directory(Path::new(".")).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![DirEntry::parent(), DirEntry::file("a.txt", 5), DirEntry::dir("sub")]
        );
    }

    #[test]
    fn test_change_directory_and_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let root = dir.path().canonicalize().unwrap();

        let mut fs_service = StdFileSystem::new(&root).unwrap();
        fs_service.change_directory(Path::new("sub")).unwrap();
        assert_eq!(fs_service.current_dir(), root.join("sub"));

        fs_service.change_directory(Path::new("..")).unwrap();
        assert_eq!(fs_service.current_dir(), root);
    }

    #[test]
    fn test_change_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let mut fs_service = StdFileSystem::new(dir.path()).unwrap();
        let before = fs_service.current_dir();
        assert!(matches!(
            fs_service.change_directory(Path::new("a.txt")),
            Err(FsError::NotADirectory(_))
        ));
        assert!(matches!(
            fs_service.change_directory(Path::new("missing")),
            Err(FsError::NotFound(_))
        ));
        assert_eq!(fs_service.current_dir(), before);
    }

    #[test]
    fn test_remove_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();

        let mut fs_service = StdFileSystem::new(dir.path()).unwrap();
        fs_service.remove(Path::new("a.txt")).unwrap();
        fs_service.remove(Path::new("sub")).unwrap();
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("sub").exists());

        let err = fs_service.remove(Path::new("a.txt")).unwrap_err();
        assert!(matches!(err, FsError::Os { op: "remove", .. }));
        assert!(err.os_code().is_some());
    }
}
