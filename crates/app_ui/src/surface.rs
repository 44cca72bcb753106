//! Render surface abstraction and an in-memory frame buffer

use crate::theme::Color;
use app_core::{Bitmap, Rect};
use image::RgbaImage;
use std::path::Path;

/// Glyph cell used to lay out text
pub const GLYPH_WIDTH: i32 = 6;
pub const GLYPH_HEIGHT: i32 = 8;

/// 2D surface the renderer draws into
pub trait RenderSurface {
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a single line of text; glyphs that would cross `clip` are dropped
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, clip: Rect);

    /// Alpha-blend `bitmap` with its top-left corner at (x, y)
    fn blit(&mut self, x: i32, y: i32, bitmap: &Bitmap);
}

/// Number of glyphs of `text` that fit between `x` and the clip's right edge
pub fn fitting_glyphs(x: i32, clip: Rect) -> usize {
    ((clip.right() - x) / GLYPH_WIDTH).max(0) as usize
}

/// Text drawn on a [`FrameBuffer`] and still visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: Color,
}

/// RGBA frame buffer.
///
/// Text is rasterised as solid glyph cells and also kept as text runs, so the
/// visible strings can be inspected. Filling a rectangle discards the runs it
/// covers.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    image: RgbaImage,
    runs: Vec<TextRun>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
            runs: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.image.width() && y < self.image.height()).then(|| *self.image.get_pixel(x, y))
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Visible strings starting inside `rect`, top to bottom
    pub fn text_in(&self, rect: Rect) -> Vec<&str> {
        let mut runs: Vec<&TextRun> = self
            .runs
            .iter()
            .filter(|r| rect.contains(app_core::TouchPoint::new(r.x, r.y)))
            .collect();
        runs.sort_by_key(|r| (r.y, r.x));
        runs.into_iter().map(|r| r.text.as_str()).collect()
    }

    /// Write the frame as a PNG
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| anyhow::anyhow!("Failed to save snapshot {}: {}", path.display(), e))?;
        tracing::info!("Snapshot written to {}", path.display());
        Ok(())
    }

    /// Clip `rect` to the image, as pixel ranges
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.image.width() as i32);
        let y1 = rect.bottom().min(self.image.height() as i32);
        (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl RenderSurface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
        self.runs
            .retain(|r| !rect.contains(app_core::TouchPoint::new(r.x, r.y)));
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, clip: Rect) {
        let visible: String = text.chars().take(fitting_glyphs(x, clip)).collect();
        if visible.is_empty() {
            return;
        }

        for (i, ch) in visible.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cell_x = x + i as i32 * GLYPH_WIDTH + 1;
            let cell = Rect::new(cell_x, y + 1, GLYPH_WIDTH - 2, GLYPH_HEIGHT - 2);
            if let Some((x0, y0, x1, y1)) = self.clip(cell) {
                for py in y0..y1.min(clip.bottom().max(0) as u32) {
                    for px in x0..x1 {
                        self.image.put_pixel(px, py, color);
                    }
                }
            }
        }

        self.runs.push(TextRun {
            x,
            y,
            text: visible,
            color,
        });
    }

    fn blit(&mut self, x: i32, y: i32, bitmap: &Bitmap) {
        let (width, height) = (self.image.width() as i32, self.image.height() as i32);
        for (bx, by, src) in bitmap.enumerate_pixels() {
            let px = x + bx as i32;
            let py = y + by as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                continue;
            }
            let alpha = src[3] as u16;
            if alpha == 0 {
                continue;
            }
            let dst = self.image.get_pixel_mut(px as u32, py as u32);
            for c in 0..3 {
                dst[c] = ((src[c] as u16 * alpha + dst[c] as u16 * (255 - alpha)) / 255) as u8;
            }
            dst[3] = 255;
        }
    }
}
