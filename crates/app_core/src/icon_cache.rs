//! Row icon cache
//!
//! A fixed ring of slots sized to the visible rows plus some slack. Listing
//! index `i` always lands in slot `i % capacity`, so the rows of any scroll
//! window map to distinct slots and scrolling by a row only evicts the slot
//! that scrolled out. A slot is reused only while its tag still matches
//! (listing generation, index, selection state); anything else regenerates.

use crate::host::{Bitmap, IconResolver};
use app_fs::DirEntry;
use bytesize::ByteSize;
use image::{imageops, Rgba, RgbaImage};

const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
const FOLDER: Rgba<u8> = Rgba([240, 200, 64, 255]);
const EXEC_BODY: Rgba<u8> = Rgba([72, 160, 88, 255]);
const EXEC_BAR: Rgba<u8> = Rgba([32, 88, 40, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HIGHLIGHT: [u8; 3] = [0, 0, 255];

/// Which built-in bitmap an entry gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Folder,
    Executable,
    /// Resolved through the host, generic page if unresolved
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotTag {
    generation: u64,
    index: usize,
    selected: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    tag: Option<SlotTag>,
    bitmap: Bitmap,
}

#[derive(Debug, Clone)]
struct BuiltinIcons {
    folder: Bitmap,
    executable: Bitmap,
    file: Bitmap,
}

impl BuiltinIcons {
    fn new(size: u32) -> Self {
        Self {
            folder: folder_icon(size),
            executable: executable_icon(size),
            file: file_icon(size),
        }
    }
}

/// Slot pool for the visible rows' icons
#[derive(Debug, Clone)]
pub struct IconCache {
    slots: Vec<Slot>,
    size: u32,
    executables: Vec<String>,
    builtin: BuiltinIcons,
    generation: u64,
    regenerations: u64,
}

impl IconCache {
    /// `capacity` must cover the visible rows; `size` is the icon edge in pixels (at least 8)
    pub fn new(capacity: usize, size: u32, executables: Vec<String>) -> Self {
        let size = size.max(8);
        let slots = (0..capacity.max(1))
            .map(|_| Slot {
                tag: None,
                bitmap: RgbaImage::new(size, size),
            })
            .collect();

        Self {
            slots,
            size,
            executables: executables.iter().map(|e| e.to_ascii_lowercase()).collect(),
            builtin: BuiltinIcons::new(size),
            generation: 0,
            regenerations: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn icon_size(&self) -> u32 {
        self.size
    }

    /// Slots regenerated since creation
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Drop every cached bitmap; call whenever listing indices change meaning
    pub fn invalidate_all(&mut self) {
        self.generation += 1;
        tracing::debug!("Icon cache invalidated (generation {})", self.generation);
    }

    pub fn kind_of(&self, entry: &DirEntry) -> IconKind {
        if entry.is_dir {
            IconKind::Folder
        } else if self.executables.contains(&entry.extension()) {
            IconKind::Executable
        } else {
            IconKind::File
        }
    }

    /// Human-readable type of an entry
    pub fn type_label(&self, entry: &DirEntry, resolver: &dyn IconResolver) -> String {
        match self.kind_of(entry) {
            IconKind::Folder => "Folder".to_string(),
            IconKind::Executable => "Executable".to_string(),
            IconKind::File => resolver
                .description_for(&entry.name)
                .unwrap_or_else(|| "File".to_string()),
        }
    }

    /// One-line summary for the info panel
    pub fn details(&self, entry: &DirEntry, resolver: &dyn IconResolver) -> String {
        let label = self.type_label(entry, resolver);
        if entry.is_dir {
            label
        } else {
            format!("{}  {}", label, ByteSize(entry.size))
        }
    }

    /// Icon for the entry at listing `index`, regenerating its slot if stale
    pub fn icon_for(
        &mut self,
        index: usize,
        entry: &DirEntry,
        selected: bool,
        resolver: &dyn IconResolver,
    ) -> &Bitmap {
        let tag = SlotTag {
            generation: self.generation,
            index,
            selected,
        };
        let slot_index = index % self.slots.len();

        if self.slots[slot_index].tag != Some(tag) {
            let bitmap = self.generate(entry, selected, resolver);
            let slot = &mut self.slots[slot_index];
            slot.bitmap = bitmap;
            slot.tag = Some(tag);
            self.regenerations += 1;
        }

        &self.slots[slot_index].bitmap
    }

    fn generate(&self, entry: &DirEntry, selected: bool, resolver: &dyn IconResolver) -> Bitmap {
        let mut bitmap = match self.kind_of(entry) {
            IconKind::Folder => self.builtin.folder.clone(),
            IconKind::Executable => self.builtin.executable.clone(),
            IconKind::File => match resolver.icon_bitmap_for(&entry.name) {
                Some(custom) if custom.dimensions() == (self.size, self.size) => custom,
                Some(custom) => {
                    imageops::resize(&custom, self.size, self.size, imageops::FilterType::Nearest)
                }
                None => self.builtin.file.clone(),
            },
        };

        if selected {
            tint(&mut bitmap);
        }
        bitmap
    }
}

/// Blend opaque pixels halfway towards the selection colour
fn tint(bitmap: &mut Bitmap) {
    for pixel in bitmap.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u16 + HIGHLIGHT[c] as u16) / 2) as u8;
        }
    }
}

fn on_border(x: u32, y: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
    (x == x0 || x == x1) && (y0..=y1).contains(&y) || (y == y0 || y == y1) && (x0..=x1).contains(&x)
}

fn folder_icon(size: u32) -> Bitmap {
    let last = size - 1;
    let tab_w = size * 2 / 5;
    let top = size / 5;
    let body_top = top + size / 8;

    RgbaImage::from_fn(size, size, |x, y| {
        let in_tab = y >= top && y < body_top && x <= tab_w;
        let in_body = y >= body_top && y < last;
        if !(in_tab || in_body) {
            return CLEAR;
        }
        let tab_edge = in_tab && (y == top || x == 0 || x == tab_w);
        if on_border(x, y, 0, body_top, last, last - 1) || tab_edge {
            OUTLINE
        } else {
            FOLDER
        }
    })
}

fn executable_icon(size: u32) -> Bitmap {
    let last = size - 1;
    let margin = size / 8;
    let bar = margin + size / 5;

    RgbaImage::from_fn(size, size, |x, y| {
        if x < margin || y < margin || x > last - margin || y > last - margin {
            CLEAR
        } else if on_border(x, y, margin, margin, last - margin, last - margin) {
            OUTLINE
        } else if y <= bar {
            EXEC_BAR
        } else {
            EXEC_BODY
        }
    })
}

fn file_icon(size: u32) -> Bitmap {
    let last = size - 1;
    let left = size / 6;
    let right = last - size / 6;
    let ear = size / 4;

    RgbaImage::from_fn(size, size, |x, y| {
        if x < left || x > right {
            return CLEAR;
        }
        // folded corner
        let corner_x = right - ear;
        if x > corner_x && y < ear {
            return if x - corner_x == y + 1 || y + 1 == ear { OUTLINE } else { CLEAR };
        }
        if x == left || x == right || y == 0 || y == last || (x == corner_x && y < ear) {
            OUTLINE
        } else {
            PAPER
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoIconResolver;
    use std::cell::Cell;

    struct CountingResolver {
        lookups: Cell<usize>,
    }

    impl IconResolver for CountingResolver {
        fn icon_bitmap_for(&self, _filename: &str) -> Option<Bitmap> {
            self.lookups.set(self.lookups.get() + 1);
            Some(RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 255])))
        }

        fn description_for(&self, _filename: &str) -> Option<String> {
            Some("Custom".to_string())
        }
    }

    fn entries(n: usize) -> Vec<DirEntry> {
        (0..n).map(|i| DirEntry::file(format!("file{:03}.txt", i), 100)).collect()
    }

    fn render_window(
        cache: &mut IconCache,
        entries: &[DirEntry],
        start: usize,
        rows: usize,
        selected: Option<usize>,
    ) {
        for index in start..(start + rows).min(entries.len()) {
            cache.icon_for(index, &entries[index], selected == Some(index), &NoIconResolver);
        }
    }

    #[test]
    fn test_repeated_render_regenerates_nothing() {
        let list = entries(40);
        let mut cache = IconCache::new(11, 16, vec!["fx2".into()]);

        render_window(&mut cache, &list, 0, 9, None);
        assert_eq!(cache.regenerations(), 9);
        render_window(&mut cache, &list, 0, 9, None);
        assert_eq!(cache.regenerations(), 9);
    }

    #[test]
    fn test_scroll_by_one_regenerates_one_row() {
        let list = entries(40);
        let mut cache = IconCache::new(11, 16, Vec::new());

        render_window(&mut cache, &list, 0, 9, None);
        render_window(&mut cache, &list, 1, 9, None);
        assert_eq!(cache.regenerations(), 10);

        // a full page away: every row is new
        render_window(&mut cache, &list, 20, 9, None);
        assert_eq!(cache.regenerations(), 19);
    }

    #[test]
    fn test_selection_change_regenerates_two_rows() {
        let list = entries(40);
        let mut cache = IconCache::new(11, 16, Vec::new());

        render_window(&mut cache, &list, 0, 9, Some(2));
        render_window(&mut cache, &list, 0, 9, Some(5));
        assert_eq!(cache.regenerations(), 11);
    }

    #[test]
    fn test_invalidate_all_forces_regeneration() {
        let list = entries(5);
        let mut cache = IconCache::new(11, 16, Vec::new());
        render_window(&mut cache, &list, 0, 9, None);
        cache.invalidate_all();
        render_window(&mut cache, &list, 0, 9, None);
        assert_eq!(cache.regenerations(), 10);
    }

    #[test]
    fn test_kinds_and_resolver_fallback() {
        let cache = IconCache::new(4, 16, vec!["FX2".into()]);
        assert_eq!(cache.kind_of(&DirEntry::dir("Documents")), IconKind::Folder);
        assert_eq!(cache.kind_of(&DirEntry::parent()), IconKind::Folder);
        assert_eq!(cache.kind_of(&DirEntry::file("notes.fx2", 1)), IconKind::Executable);
        assert_eq!(cache.kind_of(&DirEntry::file("zzz.txt", 1)), IconKind::File);

        assert_eq!(cache.type_label(&DirEntry::file("zzz.txt", 1), &NoIconResolver), "File");
        assert_eq!(cache.details(&DirEntry::dir("Documents"), &NoIconResolver), "Folder");
        let details = cache.details(&DirEntry::file("a.bin", 2048), &NoIconResolver);
        assert!(details.starts_with("File  "));
    }

    #[test]
    fn test_resolver_bitmap_is_scaled_and_tinted() {
        let resolver = CountingResolver { lookups: Cell::new(0) };
        let mut cache = IconCache::new(4, 16, Vec::new());
        let entry = DirEntry::file("photo.png", 1);

        let plain = cache.icon_for(0, &entry, false, &resolver).clone();
        assert_eq!(plain.dimensions(), (16, 16));
        let selected = cache.icon_for(0, &entry, true, &resolver).clone();
        assert_ne!(plain.get_pixel(8, 8), selected.get_pixel(8, 8));
        assert_eq!(resolver.lookups.get(), 2);

        cache.icon_for(0, &entry, true, &resolver);
        assert_eq!(resolver.lookups.get(), 2);
        assert_eq!(cache.type_label(&entry, &resolver), "Custom");
    }

    #[test]
    fn test_builtin_icons_have_outlines() {
        for icon in [folder_icon(16), executable_icon(16), file_icon(16)] {
            assert_eq!(icon.dimensions(), (16, 16));
            assert!(icon.pixels().any(|p| *p == OUTLINE));
            assert!(icon.pixels().any(|p| p[3] == 0));
        }
    }
}
