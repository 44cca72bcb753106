//! Screen layout and hit-testing

use crate::config::LayoutConfig;
use crate::input::TouchPoint;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn contains(&self, point: TouchPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Split into `n` equal columns (the last one takes the remainder)
    pub fn columns(&self, n: usize) -> Vec<Rect> {
        let n = n.max(1) as i32;
        let width = self.w / n;
        (0..n)
            .map(|i| {
                let w = if i == n - 1 { self.w - width * i } else { width };
                Rect::new(self.x + width * i, self.y, w, self.h)
            })
            .collect()
    }
}

/// Regions of the screen, derived from the layout configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub screen: Rect,
    /// Path / breadcrumb bar
    pub path: Rect,
    pub list: Rect,
    /// Info panel, replaced by the command bar in the command menu
    pub info: Rect,
    pub status: Rect,
    pub row_height: i32,
    pub visible_rows: usize,
    pub icon_size: i32,
}

impl Layout {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let width = config.screen_width as i32;
        let height = config.screen_height as i32;
        let header = config.header_height as i32;
        let info_h = config.info_height as i32;
        let status_h = config.status_height as i32;
        let row_height = (config.row_height as i32).max(1);

        let list_h = (height - header - info_h - status_h).max(row_height);
        let list = Rect::new(0, header, width, list_h);

        Self {
            screen: Rect::new(0, 0, width, height),
            path: Rect::new(0, 0, width, header),
            list,
            info: Rect::new(0, list.bottom(), width, info_h),
            status: Rect::new(0, list.bottom() + info_h, width, status_h),
            row_height,
            visible_rows: (list_h / row_height).max(1) as usize,
            icon_size: row_height,
        }
    }

    /// Rectangle of the `row`-th visible list row
    pub fn row_rect(&self, row: usize) -> Rect {
        Rect::new(
            self.list.x,
            self.list.y + self.row_height * row as i32,
            self.list.w,
            self.row_height,
        )
    }

    /// Visible row under a touch, if any
    pub fn row_at(&self, point: TouchPoint) -> Option<usize> {
        if !self.list.contains(point) {
            return None;
        }
        let row = ((point.y - self.list.y) / self.row_height) as usize;
        (row < self.visible_rows).then_some(row)
    }

    /// Confirmation dialog drawn over the list
    pub fn dialog(&self) -> Rect {
        let w = self.list.w * 3 / 4;
        let h = (self.row_height * 4).min(self.list.h);
        Rect::new(
            self.list.x + (self.list.w - w) / 2,
            self.list.y + (self.list.h - h) / 2,
            w,
            h,
        )
    }

    /// "Yes" and "No" buttons of the confirmation dialog
    pub fn dialog_buttons(&self) -> (Rect, Rect) {
        let dialog = self.dialog();
        let half = dialog.w / 2;
        let y = dialog.bottom() - self.row_height - 4;
        (
            Rect::new(dialog.x + 6, y, half - 9, self.row_height),
            Rect::new(dialog.x + half + 3, y, half - 9, self.row_height),
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}
