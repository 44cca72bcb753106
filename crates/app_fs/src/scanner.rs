//! Directory scanning - filtering and sorting entries into a Listing

use crate::{DirEntry, FileSystem, FsError, Listing, Result};
use std::cmp::Ordering;
use std::path::Path;

/// Name of the parent-directory entry
pub const PARENT_ENTRY: &str = "..";

/// Dot-files are hidden, except the parent entry
pub fn is_listed(name: &str) -> bool {
    !name.starts_with('.') || name == PARENT_ENTRY
}

/// Listing order: `..` first, then directories, then files.
///
/// Names compare case-insensitively; names equal under that comparison fall
/// back to byte order so the result never depends on read order.
pub fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    match (a.is_parent(), b.is_parent()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    // Directories always come first
    if a.is_dir != b.is_dir {
        return if a.is_dir { Ordering::Less } else { Ordering::Greater };
    }

    let folded_a = a.name.chars().flat_map(char::to_lowercase);
    let folded_b = b.name.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.name.cmp(&b.name))
}

/// Scan `path` into a sorted Listing.
///
/// Nothing is returned on failure, so a caller's previous listing stays the
/// only one in play.
pub fn scan<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Listing> {
    let raw = fs.scan_directory(path)?;

    let mut entries = Vec::new();
    entries
        .try_reserve_exact(raw.len())
        .map_err(|_| FsError::ResourceExhausted(path.display().to_string()))?;
    entries.extend(raw.into_iter().filter(|e| is_listed(&e.name)));

    entries.sort_by(compare_entries);

    tracing::debug!("Scanned {}: {} entries", path.display(), entries.len());
    Ok(Listing::from_sorted(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFileSystem;

    fn names(listing: &Listing) -> Vec<&str> {
        listing.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_hidden_files_filtered() {
        assert!(is_listed(".."));
        assert!(is_listed("notes.fx2"));
        assert!(!is_listed("."));
        assert!(!is_listed(".hidden"));
        assert!(!is_listed("..."));
    }

    #[test]
    fn test_sort_order() {
        let mut entries = vec![
            DirEntry::file("zzz.txt", 1),
            DirEntry::file("Alpha.txt", 1),
            DirEntry::dir("beta"),
            DirEntry::file("notes.fx2", 1),
            DirEntry::parent(),
            DirEntry::dir("Documents"),
            DirEntry::dir("apps"),
        ];
        entries.sort_by(compare_entries);

        let sorted: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            sorted,
            vec!["..", "apps", "beta", "Documents", "Alpha.txt", "notes.fx2", "zzz.txt"]
        );
    }

    #[test]
    fn test_case_ties_are_total() {
        let mut forward = vec![DirEntry::file("readme", 1), DirEntry::file("README", 1)];
        let mut backward = vec![DirEntry::file("README", 1), DirEntry::file("readme", 1)];
        forward.sort_by(compare_entries);
        backward.sort_by(compare_entries);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let mut fs = MemoryFileSystem::new();
        fs.add_file("/root/zzz.txt", 4)
            .add_file("/root/.profile", 1)
            .add_file("/root/notes.fx2", 120)
            .add_dir("/root/Documents");

        let first = scan(&fs, Path::new("/root")).unwrap();
        let second = scan(&fs, Path::new("/root")).unwrap();

        assert_eq!(names(&first), vec!["..", "Documents", "notes.fx2", "zzz.txt"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_failure_is_an_error() {
        let mut fs = MemoryFileSystem::new();
        fs.add_dir("/locked").deny_scan("/locked");

        assert!(matches!(
            scan(&fs, Path::new("/locked")),
            Err(FsError::AccessDenied(_))
        ));
        assert!(matches!(
            scan(&fs, Path::new("/missing")),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn test_scan_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"bb").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"h").unwrap();
        std::fs::create_dir(dir.path().join("A")).unwrap();

        let fs = crate::StdFileSystem::new(dir.path()).unwrap();
        let listing = scan(&fs, Path::new(".")).unwrap();
        assert_eq!(names(&listing), vec!["..", "A", "b.txt"]);
        assert_eq!(listing.get(2).map(|e| e.size), Some(2));
    }
}
