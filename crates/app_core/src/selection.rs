//! Selection and scroll position over the current listing

use crate::region::{Region, RegionInvalidation};
use std::ops::Range;

/// Selected index and scroll offset.
///
/// Invariants, for a listing of `len` entries:
/// - `scroll <= len.saturating_sub(visible_rows)`
/// - `selected`, when set, is `< len`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Option<usize>,
    scroll: usize,
    visible_rows: usize,
}

impl SelectionModel {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            selected: None,
            scroll: 0,
            visible_rows: visible_rows.max(1),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn max_scroll(&self, len: usize) -> usize {
        len.saturating_sub(self.visible_rows)
    }

    /// Listing indices currently on screen
    pub fn visible_window(&self, len: usize) -> Range<usize> {
        let start = self.scroll.min(len);
        start..(start + self.visible_rows).min(len)
    }

    /// Listing index shown on a visible row, if the row holds an entry
    pub fn index_at_row(&self, row: usize, len: usize) -> Option<usize> {
        let index = self.scroll + row;
        (row < self.visible_rows && index < len).then_some(index)
    }

    /// Select `index`.
    ///
    /// Only the info panel and the two affected rows are dirtied. Returns
    /// false when nothing changed.
    pub fn select_at(
        &mut self,
        index: usize,
        len: usize,
        regions: &mut RegionInvalidation,
    ) -> bool {
        if index >= len || self.selected == Some(index) {
            return false;
        }

        if let Some(previous) = self.selected.replace(index) {
            regions.mark_row(previous);
        }
        regions.mark_row(index);
        regions.mark_dirty(Region::Info);
        true
    }

    pub fn clear_selection(&mut self, regions: &mut RegionInvalidation) {
        if let Some(previous) = self.selected.take() {
            regions.mark_row(previous);
            regions.mark_dirty(Region::Info);
        }
    }

    /// Scroll by `delta` rows, clamped to the listing.
    ///
    /// Returns false, leaving the list clean, when the offset did not move.
    pub fn scroll_by(
        &mut self,
        delta: isize,
        len: usize,
        regions: &mut RegionInvalidation,
    ) -> bool {
        let max = self.max_scroll(len);
        let target = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        }
        .min(max);

        if target == self.scroll {
            return false;
        }
        self.scroll = target;
        regions.mark_dirty(Region::List);
        true
    }

    /// Forget selection and scroll after the listing was replaced or shrunk
    pub fn reset(&mut self, regions: &mut RegionInvalidation) {
        self.selected = None;
        self.scroll = 0;
        regions.mark_dirty(Region::Path);
        regions.mark_dirty(Region::Info);
        regions.mark_dirty(Region::List);
    }
}
