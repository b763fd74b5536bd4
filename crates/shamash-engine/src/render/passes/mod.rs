//! Render passes.
//!
//! Pass order is fixed by the renderer: shadow, opaque PBR, sky, ground
//! shadow catcher, HUD. The PBR/sky/ground stages share one wgpu render pass
//! (and one frame bind group); shadow and HUD run in their own passes.

mod common;

pub(crate) mod frame;
pub(crate) mod ground;
pub(crate) mod hud;
pub(crate) mod pbr;
pub(crate) mod shadow;
pub(crate) mod sky;
