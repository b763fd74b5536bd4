use shamash_engine::camera::{Camera, OrbitController};
use shamash_engine::color::Color;
use shamash_engine::coords::Vec2;
use shamash_engine::core::{App, AppControl, FrameCtx};
use shamash_engine::input::Key;
use shamash_engine::render::{Hud, Renderer};
use shamash_engine::scene::Scene;
use shamash_engine::text::{FontId, FontSystem};

use crate::sample;

/// Background where the skybox does not cover (never visible in the sample,
/// which always configures a skybox).
const CLEAR_COLOR: Color = Color::new(0.012, 0.012, 0.018, 1.0);

const HUD_SIZE: f32 = 14.0;

/// The viewer application: owns the configured scene and the interaction
/// state, and delegates all drawing to the engine renderer.
pub struct ViewerApp {
    scene: Scene,
    renderer: Renderer,
    camera: Camera,
    orbit: OrbitController,

    fonts: FontSystem,
    hud_font: Option<FontId>,
    hud: Hud,

    /// Exponentially smoothed frame time for the HUD readout.
    smoothed_dt: f32,
}

impl ViewerApp {
    pub fn new(scene: Scene, hud_font_bytes: Option<Vec<u8>>) -> Self {
        let mut fonts = FontSystem::new();
        let hud_font = hud_font_bytes.and_then(|bytes| match fonts.load_font(&bytes) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("HUD font unavailable: {e}");
                None
            }
        });
        if hud_font.is_none() {
            log::warn!("no usable HUD font; overlay disabled");
        }

        let mut camera = Camera::new();
        let orbit = OrbitController::new(sample::scene_focus(), 8.0);
        orbit.apply(&mut camera);

        Self {
            scene,
            renderer: Renderer::new(),
            camera,
            orbit,
            fonts,
            hud_font,
            hud: Hud::new(),
            smoothed_dt: 0.0,
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        self.orbit
            .update(&mut self.camera, ctx.input, ctx.input_frame);

        self.smoothed_dt = if ctx.time.frame_index == 0 {
            ctx.time.dt
        } else {
            self.smoothed_dt * 0.95 + ctx.time.dt * 0.05
        };

        self.hud.clear();
        if let Some(font) = self.hud_font {
            self.hud.push_text(
                format!("shamash  {:5.2} ms", self.smoothed_dt * 1000.0),
                font,
                HUD_SIZE,
                Color::new(1.0, 1.0, 1.0, 0.85),
                Vec2::new(12.0, 10.0),
            );
        }

        ctx.render(
            &mut self.renderer,
            &self.scene,
            &self.camera,
            &self.fonts,
            &self.hud,
            CLEAR_COLOR,
        )
    }
}
