//! Directory entries and the sorted listing built from one scan

use crate::scanner::PARENT_ENTRY;
use std::ops::Range;

/// One entry of a directory snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// Byte size, always 0 for directories
    pub size: u64,
}

impl DirEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            size: 0,
        }
    }

    /// The `..` entry
    pub fn parent() -> Self {
        Self::dir(PARENT_ENTRY)
    }

    pub fn is_parent(&self) -> bool {
        self.name == PARENT_ENTRY
    }

    /// Lowercased extension without the dot, empty if none
    pub fn extension(&self) -> String {
        if self.is_dir {
            return String::new();
        }
        match self.name.rfind('.') {
            Some(0) | None => String::new(),
            Some(pos) => self.name[pos + 1..].to_lowercase(),
        }
    }
}

/// Sorted entries of the current directory.
///
/// Indices are stable for the lifetime of the listing; the only in-place
/// mutation is [`Listing::remove_at`], which shifts later entries down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<DirEntry>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries that are already filtered and sorted
    pub(crate) fn from_sorted(entries: Vec<DirEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DirEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Entries in `range`, clamped to the listing
    pub fn window(&self, range: Range<usize>) -> &[DirEntry] {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        &self.entries[start..end]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Remove one entry, preserving the relative order of the rest
    pub fn remove_at(&mut self, index: usize) -> Option<DirEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a DirEntry;
    type IntoIter = std::slice::Iter<'a, DirEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
