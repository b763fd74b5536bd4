//! 2D overlay coordinate types.
//!
//! The HUD overlay draws in logical pixels (DPI-aware, origin top-left,
//! +X right, +Y down); the overlay shader converts to NDC using a viewport
//! uniform. World-space 3D math lives in `glam` types throughout the crate —
//! these types exist only for the screen-space layer.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
