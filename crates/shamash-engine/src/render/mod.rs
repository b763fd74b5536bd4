//! GPU rendering subsystem.
//!
//! The renderer consumes a retained [`Scene`](crate::scene::Scene) and issues
//! GPU commands via wgpu. Pass order per frame:
//!
//! 1. shadow map (sun depth)
//! 2. opaque PBR meshes (clears color + depth)
//! 3. sky (fills pixels still at far depth)
//! 4. ground shadow catcher (blended)
//! 5. HUD overlay (screen space)
//!
//! Each pass owns its GPU resources (pipelines, buffers) and creates them
//! lazily, rebuilding when the surface format changes.

mod cache;
mod ctx;
mod hud;
mod renderer;
pub(crate) mod passes;

pub use ctx::{RenderCtx, RenderTarget};
pub use hud::Hud;
pub use renderer::Renderer;
