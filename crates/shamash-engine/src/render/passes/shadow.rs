use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::device::DEPTH_FORMAT;
use crate::mesh::{Aabb, RawVertex};
use crate::render::RenderCtx;
use crate::render::cache::ResourceCache;
use crate::scene::Scene;

/// Shadow map resolution.
pub(crate) const SHADOW_MAP_SIZE: u32 = 2048;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LightUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Sun shadow pass: renders shadow-casting instances into a depth map from
/// the sun's orthographic frustum.
///
/// The map and comparison sampler are allocated once (fixed size); the
/// pipeline is depth-only with a depth bias against acne.
#[derive(Default)]
pub(crate) struct ShadowPass {
    map_view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,

    pipeline: Option<wgpu::RenderPipeline>,
    light_bgl: Option<wgpu::BindGroupLayout>,
    light_ubo: Option<wgpu::Buffer>,
    light_bg: Option<wgpu::BindGroup>,
}

impl ShadowPass {
    /// Texel size in shadow-map UV units.
    pub(crate) fn texel_size(&self) -> f32 {
        1.0 / SHADOW_MAP_SIZE as f32
    }

    pub(crate) fn ensure_resources(&mut self, ctx: &RenderCtx<'_>, object_bgl: &wgpu::BindGroupLayout) {
        self.ensure_map(ctx);
        self.ensure_pipeline(ctx, object_bgl);
    }

    pub(crate) fn map_view(&self) -> Option<&wgpu::TextureView> {
        self.map_view.as_ref()
    }

    pub(crate) fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }

    /// Renders the shadow map.
    ///
    /// Always clears the map — a cleared map reads as "fully lit", which
    /// keeps the receiving shaders well-defined. Casters draw only when
    /// `draw_casters` is set (sun present and shadowing enabled); instance
    /// index `i` uses object slot `i`.
    pub(crate) fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        cache: &ResourceCache,
        light_from_world: Mat4,
        draw_casters: bool,
    ) {
        let (Some(map_view), Some(pipeline), Some(light_ubo), Some(light_bg)) = (
            self.map_view.as_ref(),
            self.pipeline.as_ref(),
            self.light_ubo.as_ref(),
            self.light_bg.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(
            light_ubo,
            0,
            bytemuck::bytes_of(&LightUniforms {
                view_proj: light_from_world.to_cols_array_2d(),
            }),
        );

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shamash shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: map_view,
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

        if !draw_casters {
            return;
        }

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, light_bg, &[]);

        for (index, instance) in scene.instances().iter().enumerate() {
            if !instance.cast_shadows {
                continue;
            }
            let Some(mesh) = cache.mesh(instance.mesh) else {
                continue;
            };
            let Some(slot) = cache.object_slot(index) else {
                continue;
            };

            rpass.set_bind_group(1, &slot.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vbuf.slice(..));
            rpass.set_index_buffer(mesh.ibuf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_map(&mut self, ctx: &RenderCtx<'_>) {
        if self.map_view.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shamash shadow map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        self.map_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));

        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shamash shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, object_bgl: &wgpu::BindGroupLayout) {
        if self.pipeline.is_some() {
            return;
        }

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shamash shadow shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shadow.wgsl").into()),
            });

        let light_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shamash shadow light bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<LightUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let light_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shamash shadow light ubo"),
            size: std::mem::size_of::<LightUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let light_bg = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shamash shadow light bind group"),
            layout: &light_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shamash shadow pipeline layout"),
                bind_group_layouts: &[&light_bgl, object_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("shamash shadow pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[RawVertex::layout()],
                },

                // Depth-only: no fragment stage, no color targets.
                fragment: None,

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState {
                        constant: 2,
                        slope_scale: 2.0,
                        clamp: 0.0,
                    },
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        self.light_bgl = Some(light_bgl);
        self.light_ubo = Some(light_ubo);
        self.light_bg = Some(light_bg);
        self.pipeline = Some(pipeline);
    }
}

/// Fits an orthographic sun frustum around `bounds`.
///
/// The eye backs away from the bounds center along the light direction; the
/// projection window is the bounds' extent in light space, slightly padded so
/// rasterization at the edges is not clipped.
pub(crate) fn fit_sun_frustum(direction: Vec3, bounds: Aabb) -> Mat4 {
    let dir = if direction.length_squared() > 1e-12 {
        direction.normalize()
    } else {
        Vec3::NEG_Y
    };

    let center = bounds.center();
    let radius = (bounds.extent().length() * 0.5).max(1e-3);

    let eye = center - dir * radius * 2.0;
    let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let view = Mat4::look_at_rh(eye, center, up);

    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for corner in bounds.corners() {
        let p = view.transform_point3(corner);
        min = min.min(p);
        max = max.max(p);
    }

    let pad = radius * 0.01;
    let near = (-max.z - pad).max(1e-3);
    let far = -min.z + pad;

    let proj = Mat4::orthographic_rh(
        min.x - pad,
        max.x + pad,
        min.y - pad,
        max.y + pad,
        near,
        far,
    );
    proj * view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_corners_inside(m: Mat4, bounds: Aabb) {
        for corner in bounds.corners() {
            let p = m.project_point3(corner);
            assert!(
                p.x >= -1.001 && p.x <= 1.001,
                "x out of clip: {p:?} for {corner:?}"
            );
            assert!(
                p.y >= -1.001 && p.y <= 1.001,
                "y out of clip: {p:?} for {corner:?}"
            );
            assert!(
                p.z >= -0.001 && p.z <= 1.001,
                "z out of clip: {p:?} for {corner:?}"
            );
        }
    }

    #[test]
    fn frustum_contains_bounds_for_vertical_sun() {
        let bounds = Aabb::new(Vec3::new(-2.0, 0.0, -6.0), Vec3::new(5.0, 2.0, -2.0));
        let m = fit_sun_frustum(Vec3::NEG_Y, bounds);
        assert_corners_inside(m, bounds);
    }

    #[test]
    fn frustum_contains_bounds_for_slanted_sun() {
        let bounds = Aabb::new(Vec3::new(-0.5, -0.5, -4.5), Vec3::new(4.5, 1.2, -3.5));
        let m = fit_sun_frustum(Vec3::new(0.2, -1.0, -0.8), bounds);
        assert_corners_inside(m, bounds);
    }

    #[test]
    fn zero_direction_falls_back_to_down() {
        let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let m = fit_sun_frustum(Vec3::ZERO, bounds);
        assert!(m.is_finite());
        assert_corners_inside(m, bounds);
    }

    #[test]
    fn degenerate_bounds_stay_finite() {
        // A flat (zero-height) caster set must not produce NaNs.
        let bounds = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let m = fit_sun_frustum(Vec3::new(0.0, -1.0, 0.0), bounds);
        assert!(m.is_finite());
    }
}
