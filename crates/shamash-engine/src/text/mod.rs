//! Font loading for the HUD overlay.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
