//! CPU textures + GPU upload.
//!
//! Responsibilities:
//! - decoding image files (PNG/JPEG) into RGBA8 with the right color space
//! - procedural fallback textures (checkerboard, solid, flat normal)
//! - CPU mip-chain generation and aligned mip-mapped upload

mod data;
mod mips;

pub use data::{ColorSpace, TextureData};
pub use mips::mip_level_count;
