//! PocketFiler UI Layer
//!
//! Provides:
//! - The render pass that redraws dirty screen regions
//! - The render surface trait and an RGBA frame buffer
//! - Theming

pub mod renderer;
pub mod surface;
pub mod theme;

pub use renderer::Renderer;
pub use surface::{FrameBuffer, RenderSurface, TextRun};
pub use theme::{Color, Theme};
