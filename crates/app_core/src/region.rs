//! Redraw tracking for the four screen regions
//!
//! Mutations mark regions (or single list rows) dirty; the render pass drains
//! the set and redraws only what it was handed. The status region also owns
//! the message countdown, so an expiring message dirties it again.

use std::collections::BTreeSet;

/// Independently redrawable screen area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Region {
    Path = 1,
    Info = 2,
    List = 4,
    Status = 8,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Path, Region::Info, Region::List, Region::Status];

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Set of regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionSet(u8);

impl RegionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(15)
    }

    pub fn insert(&mut self, region: Region) {
        self.0 |= region.bits();
    }

    pub fn contains(self, region: Region) -> bool {
        self.0 & region.bits() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Region> {
        Region::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut set = Self::empty();
        for region in iter {
            set.insert(region);
        }
        set
    }
}

/// Status message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// What a render pass has to redraw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    pub regions: RegionSet,
    /// Listing indices to redraw when the list as a whole is clean
    pub rows: Vec<usize>,
}

impl DirtySet {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.rows.is_empty()
    }
}

/// Dirty flags plus the status countdown
#[derive(Debug, Clone)]
pub struct RegionInvalidation {
    dirty: RegionSet,
    rows: BTreeSet<usize>,
    status: Option<StatusMessage>,
    status_ticks: u32,
    status_duration: u32,
}

impl RegionInvalidation {
    /// Everything starts dirty so the first pass draws the whole screen
    pub fn new(status_duration: u32) -> Self {
        Self {
            dirty: RegionSet::all(),
            rows: BTreeSet::new(),
            status: None,
            status_ticks: 0,
            status_duration,
        }
    }

    pub fn mark_dirty(&mut self, region: Region) {
        self.dirty.insert(region);
        if region == Region::List {
            self.rows.clear();
        }
    }

    pub fn mark_all(&mut self) {
        for region in Region::ALL {
            self.mark_dirty(region);
        }
    }

    /// Mark single list rows, by listing index
    pub fn mark_row(&mut self, index: usize) {
        if !self.dirty.contains(Region::List) {
            self.rows.insert(index);
        }
    }

    pub fn is_dirty(&self, region: Region) -> bool {
        self.dirty.contains(region)
    }

    /// Rows pending a row-scoped redraw
    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    /// Take everything that needs drawing, leaving the set clean
    pub fn drain(&mut self) -> DirtySet {
        let regions = std::mem::take(&mut self.dirty);
        let rows = std::mem::take(&mut self.rows);
        DirtySet {
            regions,
            rows: rows.into_iter().collect(),
        }
    }

    /// Show a message for the configured number of ticks
    pub fn show_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        let text = text.into();
        tracing::debug!("Status ({:?}): {}", level, text);
        self.status = Some(StatusMessage { text, level });
        self.status_ticks = self.status_duration;
        self.mark_dirty(Region::Status);
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns true when the message expired on this tick.
    pub fn tick(&mut self) -> bool {
        if self.status.is_none() {
            return false;
        }

        self.status_ticks = self.status_ticks.saturating_sub(1);
        if self.status_ticks == 0 {
            self.status = None;
            self.mark_dirty(Region::Status);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(duration: u32) -> RegionInvalidation {
        let mut regions = RegionInvalidation::new(duration);
        regions.drain();
        regions
    }

    #[test]
    fn test_starts_fully_dirty() {
        let mut regions = RegionInvalidation::new(180);
        let dirty = regions.drain();
        assert_eq!(dirty.regions, RegionSet::all());
        assert!(regions.drain().is_empty());
    }

    #[test]
    fn test_rows_are_subsumed_by_full_list_redraw() {
        let mut regions = clean(180);
        regions.mark_row(3);
        regions.mark_row(1);
        assert_eq!(regions.dirty_rows().collect::<Vec<_>>(), vec![1, 3]);

        regions.mark_dirty(Region::List);
        regions.mark_row(5);
        let dirty = regions.drain();
        assert!(dirty.regions.contains(Region::List));
        assert!(dirty.rows.is_empty());
    }

    #[test]
    fn test_status_expires_after_duration() {
        let mut regions = clean(180);
        regions.show_status("Deleted temp.log", StatusLevel::Success);
        assert!(regions.drain().regions.contains(Region::Status));

        for _ in 0..179 {
            assert!(!regions.tick());
        }
        assert!(regions.status().is_some());
        assert!(regions.drain().is_empty());

        assert!(regions.tick());
        assert!(regions.status().is_none());
        assert_eq!(regions.drain().regions.iter().collect::<Vec<_>>(), vec![Region::Status]);
        assert!(!regions.tick());
    }

    #[test]
    fn test_new_message_restarts_countdown() {
        let mut regions = clean(3);
        regions.show_status("first", StatusLevel::Info);
        regions.tick();
        regions.tick();
        regions.show_status("second", StatusLevel::Error);
        regions.tick();
        regions.tick();
        assert_eq!(regions.status().map(|s| s.text.as_str()), Some("second"));
        assert!(regions.tick());
    }
}
