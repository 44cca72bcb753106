//! Services the host provides to the core

use std::collections::HashMap;
use std::path::Path;

/// RGBA icon / surface bitmap
pub type Bitmap = image::RgbaImage;

/// Per-file icon and type-label lookup.
///
/// Both lookups are best effort; `None` falls back to the built-in generic
/// file icon and label.
pub trait IconResolver {
    fn icon_bitmap_for(&self, filename: &str) -> Option<Bitmap>;
    fn description_for(&self, filename: &str) -> Option<String>;
}

/// Hands a file to whatever the host associates with it
pub trait FileOpener {
    /// Fire and forget; the core never learns the outcome
    fn open_file(&mut self, path: &Path);
}

/// Resolver that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIconResolver;

impl IconResolver for NoIconResolver {
    fn icon_bitmap_for(&self, _filename: &str) -> Option<Bitmap> {
        None
    }

    fn description_for(&self, _filename: &str) -> Option<String> {
        None
    }
}

/// Type labels by extension, no custom bitmaps
#[derive(Debug, Clone, Default)]
pub struct ExtensionResolver {
    labels: HashMap<String, String>,
}

impl ExtensionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common file types
    pub fn with_defaults() -> Self {
        let mut resolver = Self::new();
        for (ext, label) in [
            ("txt", "Text document"),
            ("log", "Log file"),
            ("md", "Markdown document"),
            ("png", "PNG image"),
            ("bmp", "Bitmap image"),
            ("jpg", "JPEG image"),
            ("wav", "Wave audio"),
            ("zip", "ZIP archive"),
        ] {
            resolver.insert(ext, label);
        }
        resolver
    }

    pub fn insert(&mut self, extension: &str, label: &str) {
        self.labels.insert(extension.to_ascii_lowercase(), label.to_string());
    }
}

impl IconResolver for ExtensionResolver {
    fn icon_bitmap_for(&self, _filename: &str) -> Option<Bitmap> {
        None
    }

    fn description_for(&self, filename: &str) -> Option<String> {
        let (_, ext) = filename.rsplit_once('.')?;
        self.labels.get(&ext.to_ascii_lowercase()).cloned()
    }
}

/// Opener that only logs the request
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOpener;

impl FileOpener for LogOpener {
    fn open_file(&mut self, path: &Path) {
        tracing::info!("Open requested: {}", path.display());
    }
}
