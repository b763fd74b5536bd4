use std::collections::HashMap;

use crate::device::DEPTH_FORMAT;
use crate::mesh::RawVertex;
use crate::render::RenderCtx;
use crate::render::cache::ResourceCache;
use crate::scene::{MaterialId, Scene};

/// Opaque textured-lit mesh pass.
///
/// Bind groups: 0 = frame (camera/sun/ambient/shadow), 1 = material
/// (four maps + sampler), 2 = object (model + normal matrix).
#[derive(Default)]
pub(crate) struct PbrPass {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    material_bgl: Option<wgpu::BindGroupLayout>,

    /// Material bind groups keyed by material id; materials are immutable so
    /// entries never invalidate.
    material_bind_groups: HashMap<usize, wgpu::BindGroup>,

    warned_bad_instance: bool,
}

impl PbrPass {
    pub(crate) fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, frame_bgl: &wgpu::BindGroupLayout, object_bgl: &wgpu::BindGroupLayout) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shamash pbr shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pbr.wgsl").into()),
            });

        let material_bgl = &*self.material_bgl.get_or_insert_with(|| {
            let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            };
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("shamash material bgl"),
                    entries: &[
                        texture_entry(0), // albedo
                        texture_entry(1), // metallic
                        texture_entry(2), // roughness
                        texture_entry(3), // normal
                        wgpu::BindGroupLayoutEntry {
                            binding: 4,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                })
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shamash pbr pipeline layout"),
                bind_group_layouts: &[frame_bgl, material_bgl, object_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("shamash pbr pipeline"),
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
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

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

    /// Builds (and caches) the bind group for `id`. Texture uploads must have
    /// happened already via the resource cache.
    pub(crate) fn ensure_material(
        &mut self,
        ctx: &RenderCtx<'_>,
        scene: &Scene,
        cache: &mut ResourceCache,
        id: MaterialId,
    ) -> bool {
        if self.material_bind_groups.contains_key(&material_key(id)) {
            return true;
        }
        let Some(material) = scene.material(id) else {
            return false;
        };

        let ids = [
            material.albedo,
            material.metallic,
            material.roughness,
            material.normal,
        ];
        for tex in ids {
            if !cache.ensure_texture(ctx, scene, tex) {
                return false;
            }
        }
        // The sampler must exist before the views are borrowed.
        cache.material_sampler(ctx);

        let Some(bgl) = self.material_bgl.as_ref() else {
            return false;
        };

        let views: Vec<&wgpu::TextureView> =
            ids.iter().filter_map(|&t| cache.texture_view(t)).collect();
        if views.len() != ids.len() {
            return false;
        }

        let Some(sampler) = cache.material_sampler_ref() else {
            return false;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shamash material bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(views[1]),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(views[2]),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(views[3]),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.material_bind_groups
            .insert(material_key(id), bind_group);
        true
    }

    /// Draws all instances into an already-begun render pass.
    pub(crate) fn draw(
        &mut self,
        rpass: &mut wgpu::RenderPass<'_>,
        scene: &Scene,
        cache: &ResourceCache,
        frame_bg: &wgpu::BindGroup,
    ) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bg, &[]);

        for (index, instance) in scene.instances().iter().enumerate() {
            let (Some(mesh), Some(material_bg), Some(slot)) = (
                cache.mesh(instance.mesh),
                self.material_bind_groups.get(&material_key(instance.material)),
                cache.object_slot(index),
            ) else {
                if !self.warned_bad_instance {
                    log::warn!(
                        "skipping instance {index}: mesh or material not available"
                    );
                    self.warned_bad_instance = true;
                }
                continue;
            };

            rpass.set_bind_group(1, material_bg, &[]);
            rpass.set_bind_group(2, &slot.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vbuf.slice(..));
            rpass.set_index_buffer(mesh.ibuf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[inline]
fn material_key(id: MaterialId) -> usize {
    // MaterialId is a dense index; use it directly as the cache key.
    id.0
}
