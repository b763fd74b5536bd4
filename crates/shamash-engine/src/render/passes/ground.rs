use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::device::DEPTH_FORMAT;
use crate::mesh::{MeshData, RawVertex};
use crate::render::RenderCtx;
use crate::scene::GroundPlane;

use super::common::premul_alpha_blend;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GroundUniforms {
    model: [[f32; 4]; 4],
    /// x: shadow strength.
    params: [f32; 4],
}

/// Ground-plane shadow catcher pass.
///
/// Owns a unit quad; the configured half-extent becomes a scale folded into
/// the model matrix. Blended premultiplied over whatever is behind (meshes
/// were drawn before, sky included), depth-tested but never written, never
/// culled.
#[derive(Default)]
pub(crate) struct GroundPass {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bgl: Option<wgpu::BindGroupLayout>,
    ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,

    quad_vbuf: Option<wgpu::Buffer>,
    quad_ibuf: Option<wgpu::Buffer>,
    quad_index_count: u32,
}

impl GroundPass {
    pub(crate) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        frame_bgl: &wgpu::BindGroupLayout,
        ground: &GroundPlane,
    ) {
        self.ensure_pipeline(ctx, frame_bgl);
        self.ensure_bindings(ctx);
        self.ensure_quad(ctx);

        if let Some(ubo) = self.ubo.as_ref() {
            let model = ground.transform * Mat4::from_scale(glam::Vec3::splat(ground.half_extent));
            ctx.queue.write_buffer(
                ubo,
                0,
                bytemuck::bytes_of(&GroundUniforms {
                    model: model.to_cols_array_2d(),
                    params: [ground.strength, 0.0, 0.0, 0.0],
                }),
            );
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, frame_bg: &wgpu::BindGroup) {
        let (Some(pipeline), Some(bind_group), Some(vbuf), Some(ibuf)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad_vbuf.as_ref(),
            self.quad_ibuf.as_ref(),
        ) else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bg, &[]);
        rpass.set_bind_group(1, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbuf.slice(..));
        rpass.set_index_buffer(ibuf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.quad_index_count, 0, 0..1);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_quad(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbuf.is_some() {
            return;
        }

        let quad = MeshData::plane(1.0);
        let raw: Vec<RawVertex> = quad.vertices.iter().map(|v| v.to_raw()).collect();

        self.quad_vbuf = Some(ctx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("shamash ground quad vbuf"),
                contents: bytemuck::cast_slice(&raw),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.quad_ibuf = Some(ctx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("shamash ground quad ibuf"),
                contents: bytemuck::cast_slice(&quad.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.quad_index_count = quad.indices.len() as u32;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, frame_bgl: &wgpu::BindGroupLayout) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shamash ground shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ground.wgsl").into()),
            });

        let bgl = &*self.bgl.get_or_insert_with(|| {
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("shamash ground bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<GroundUniforms>() as u64,
                            ),
                        },
                        count: None,
                    }],
                })
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shamash ground pipeline layout"),
                bind_group_layouts: &[frame_bgl, bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("shamash ground pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[RawVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The catcher must darken from both sides.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bgl.as_ref() else {
            return;
        };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shamash ground ubo"),
            size: std::mem::size_of::<GroundUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shamash ground bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }
}
