//! Application theming

use app_core::StatusLevel;
use image::Rgba;

pub type Color = Rgba<u8>;

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Rgba([r, g, b, 255])
}

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub text: Color,
    pub selected_text: Color,
    pub selected_background: Color,
    pub bar: Color,
    pub bar_text: Color,
    pub panel: Color,
    pub border: Color,
    pub button: Color,
    /// Paste button while a copy / cut is pending
    pub accent: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// White list, black text, blue selection (default)
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: rgb(255, 255, 255),
            text: rgb(0, 0, 0),
            selected_text: rgb(0, 0, 255),
            selected_background: rgb(224, 232, 255),
            bar: rgb(40, 48, 96),
            bar_text: rgb(255, 255, 255),
            panel: rgb(236, 236, 236),
            border: rgb(96, 96, 96),
            button: rgb(208, 208, 208),
            accent: rgb(255, 216, 96),
            info: rgb(0, 0, 0),
            success: rgb(0, 128, 48),
            error: rgb(200, 0, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: rgb(32, 32, 32),
            text: rgb(240, 240, 240),
            selected_text: rgb(100, 149, 237),
            selected_background: rgb(48, 56, 80),
            bar: rgb(64, 64, 64),
            bar_text: rgb(240, 240, 240),
            panel: rgb(48, 48, 48),
            border: rgb(128, 128, 128),
            button: rgb(72, 72, 72),
            accent: rgb(220, 180, 80),
            info: rgb(240, 240, 240),
            success: rgb(80, 200, 120),
            error: rgb(220, 80, 80),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn status_color(&self, level: StatusLevel) -> Color {
        match level {
            StatusLevel::Info => self.info,
            StatusLevel::Success => self.success,
            StatusLevel::Error => self.error,
        }
    }

    /// Parse a hex color string
    pub fn parse_color(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
            8 => Some(Rgba([channel(2)?, channel(4)?, channel(6)?, channel(0)?])),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
