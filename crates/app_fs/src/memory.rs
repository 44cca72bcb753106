//! In-memory filesystem
//!
//! Used by the demo host and by tests that need failures the real filesystem
//! cannot produce on demand (denied scans, denied deletes).

use crate::{DirEntry, FileSystem, FsError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

// errno values reported for injected failures
const ENOENT: i32 = 2;
const EACCES: i32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Dir,
    File(u64),
}

/// Directory tree held in memory, rooted at `/`
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<PathBuf, Node>,
    cwd: PathBuf,
    denied_scans: BTreeSet<PathBuf>,
    denied_removes: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes,
            cwd: PathBuf::from("/"),
            denied_scans: BTreeSet::new(),
            denied_removes: BTreeSet::new(),
        }
    }

    /// Create a directory and any missing parents
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = self.normalize(path.as_ref());
        self.insert_parents(&path);
        self.nodes.insert(path, Node::Dir);
        self
    }

    /// Create a file of `size` bytes, creating missing parents
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, size: u64) -> &mut Self {
        let path = self.normalize(path.as_ref());
        self.insert_parents(&path);
        self.nodes.insert(path, Node::File(size));
        self
    }

    /// Make scans of `path` fail with access denied
    pub fn deny_scan<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = self.normalize(path.as_ref());
        self.denied_scans.insert(path);
        self
    }

    /// Make removal of `path` fail with EACCES
    pub fn deny_remove<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        let path = self.normalize(path.as_ref());
        self.denied_removes.insert(path);
        self
    }

    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.nodes.contains_key(&self.normalize(path.as_ref()))
    }

    fn insert_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            self.nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    /// Absolute, lexically normalised form of `path`
    fn normalize(&self, path: &Path) -> PathBuf {
        let mut out = if path.is_absolute() {
            PathBuf::from("/")
        } else {
            self.cwd.clone()
        };

        for component in path.components() {
            match component {
                Component::RootDir | Component::Prefix(_) => out = PathBuf::from("/"),
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                Component::Normal(name) => out.push(name),
            }
        }
        out
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn scan_directory(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let dir = self.normalize(path);

        if self.denied_scans.contains(&dir) {
            return Err(FsError::AccessDenied(dir.display().to_string()));
        }
        match self.nodes.get(&dir) {
            None => return Err(FsError::NotFound(dir.display().to_string())),
            Some(Node::File(_)) => return Err(FsError::NotADirectory(dir.display().to_string())),
            Some(Node::Dir) => {}
        }

        let mut entries = Vec::new();
        if dir.parent().is_some() {
            entries.push(DirEntry::parent());
        }

        for (path, node) in &self.nodes {
            if path.parent() != Some(dir.as_path()) {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            entries.push(match node {
                Node::Dir => DirEntry::dir(name),
                Node::File(size) => DirEntry::file(name, *size),
            });
        }

        Ok(entries)
    }

    fn change_directory(&mut self, path: &Path) -> Result<()> {
        let target = self.normalize(path);
        match self.nodes.get(&target) {
            Some(Node::Dir) => {
                self.cwd = target;
                Ok(())
            }
            Some(Node::File(_)) => Err(FsError::NotADirectory(target.display().to_string())),
            None => Err(FsError::NotFound(target.display().to_string())),
        }
    }

    fn remove(&mut self, path: &Path) -> Result<()> {
        let target = self.normalize(path);

        if self.denied_removes.contains(&target) {
            return Err(FsError::os("remove", &target, io::Error::from_raw_os_error(EACCES)));
        }
        if target.parent().is_none() || !self.nodes.contains_key(&target) {
            return Err(FsError::os("remove", &target, io::Error::from_raw_os_error(ENOENT)));
        }

        self.nodes.retain(|p, _| !p.starts_with(&target));
        Ok(())
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.normalize(path)
    }
}
