use glam::Mat4;

use crate::camera::Camera;
use crate::color::Color;
use crate::scene::Scene;
use crate::text::FontSystem;

use super::cache::ResourceCache;
use super::hud::Hud;
use super::passes::frame::{FrameResources, FrameUniforms};
use super::passes::ground::GroundPass;
use super::passes::hud::HudPass;
use super::passes::pbr::PbrPass;
use super::passes::shadow::{ShadowPass, fit_sun_frustum};
use super::passes::sky::SkyPass;
use super::{RenderCtx, RenderTarget};

/// Draws a [`Scene`] through the fixed pass sequence.
///
/// Owns every GPU resource derived from the scene (uploaded meshes/textures,
/// material bind groups, pipelines). All of it is created lazily on first
/// use, so construction is trivially cheap and needs no device.
#[derive(Default)]
pub struct Renderer {
    cache: ResourceCache,
    frame: FrameResources,
    shadow: ShadowPass,
    pbr: PbrPass,
    sky: SkyPass,
    ground: GroundPass,
    hud: HudPass,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one frame: shadow map, opaque meshes, sky, ground shadow
    /// catcher, HUD overlay.
    ///
    /// `clear` is the background color used where no skybox covers the frame.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &Camera,
        fonts: &FontSystem,
        hud: &Hud,
        clear: Color,
    ) {
        // ── resource preparation (mutating; precedes all pass borrows) ─────
        self.cache.object_bgl(ctx);

        for instance in scene.instances() {
            self.cache.ensure_mesh(ctx, scene, instance.mesh);
        }

        let models: Vec<Mat4> = scene.instances().iter().map(|i| i.transform).collect();
        self.cache.prepare_object_slots(ctx, &models);

        {
            let Some(object_bgl) = self.cache.object_bgl_ref() else {
                return;
            };
            self.shadow.ensure_resources(ctx, object_bgl);
        }

        {
            let (Some(shadow_view), Some(shadow_sampler)) =
                (self.shadow.map_view(), self.shadow.sampler())
            else {
                return;
            };
            self.frame.ensure(ctx, shadow_view, shadow_sampler);
        }

        {
            let (Some(frame_bgl), Some(object_bgl)) =
                (self.frame.bgl(), self.cache.object_bgl_ref())
            else {
                return;
            };
            self.pbr.ensure_pipeline(ctx, frame_bgl, object_bgl);
        }

        for instance in scene.instances() {
            self.pbr
                .ensure_material(ctx, scene, &mut self.cache, instance.material);
        }

        if let Some(ground) = scene.ground_plane() {
            let Some(frame_bgl) = self.frame.bgl() else {
                return;
            };
            self.ground.prepare(ctx, frame_bgl, ground);
        }

        if let Some(skybox) = scene.skybox() {
            self.sky.prepare(ctx, skybox);
        }

        // ── per-frame uniforms ─────────────────────────────────────────────
        let sun_casts = scene.sun().is_some_and(|s| s.cast_shadows);
        let light_from_world = match scene.sun() {
            Some(sun) if sun.cast_shadows => {
                fit_sun_frustum(sun.direction_normalized(), scene.caster_bounds())
            }
            _ => Mat4::IDENTITY,
        };

        let uniforms = FrameUniforms::build(
            scene,
            camera,
            ctx.viewport.aspect(),
            light_from_world,
            self.shadow.texel_size(),
        );
        self.frame.write(ctx, &uniforms);

        // ── shadow pass ────────────────────────────────────────────────────
        // Always runs: clearing the map to "fully lit" keeps the receiving
        // shaders well-defined when no caster draws.
        self.shadow.render(
            ctx,
            target.encoder,
            scene,
            &self.cache,
            light_from_world,
            sun_casts,
        );

        // ── main pass: opaque meshes, then sky, then ground catcher ────────
        let Some(frame_bg) = self.frame.bind_group() else {
            return;
        };

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shamash main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.pbr.draw(&mut rpass, scene, &self.cache, frame_bg);

            if scene.skybox().is_some() {
                self.sky.draw(&mut rpass);
            }

            if scene.ground_plane().is_some() {
                self.ground.draw(&mut rpass, frame_bg);
            }
        }

        // ── overlay ────────────────────────────────────────────────────────
        self.hud.render(ctx, target, hud, fonts);
    }
}
