//! Shamash viewer: five scanned workshop props (drill, extinguisher,
//! rescue randy, pump, valve) with PBR texture sets under a sun light, a
//! pale-blue sky, and a ground-plane shadow catcher. Scene configuration
//! only; everything else is the engine's job.

mod app;
mod assets;
mod sample;

use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use shamash_engine::device::GpuInit;
use shamash_engine::logging::{LoggingConfig, init_logging};
use shamash_engine::window::{Runtime, RuntimeConfig};

use crate::app::ViewerApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Assets directory: first CLI argument, or ./assets. Missing files fall
    // back to procedural placeholders so a clean checkout still runs.
    let assets_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    log::info!("loading assets from {}", assets_dir.display());

    let scene = sample::build_scene(&assets_dir)?;
    let app = ViewerApp::new(scene, load_hud_font());

    Runtime::run(
        RuntimeConfig {
            title: "shamash".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        },
        GpuInit::default(),
        app,
    )
}

/// First system font that loads; `None` disables the HUD overlay.
fn load_hud_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
