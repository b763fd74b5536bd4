use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::scene::{MeshId, Scene, TextureId};

use super::RenderCtx;

/// Uploaded mesh geometry.
pub(crate) struct MeshBuffers {
    pub vbuf: wgpu::Buffer,
    pub ibuf: wgpu::Buffer,
    pub index_count: u32,
}

/// Per-draw uniforms shared by the shadow and PBR pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub(crate) fn from_model(model: Mat4) -> Self {
        let inv = model.inverse();
        let normal_matrix = if inv.is_finite() {
            inv.transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

/// One per-draw uniform slot (buffer + bind group).
pub(crate) struct ObjectSlot {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// GPU-side caches for scene resources.
///
/// Scene resources are immutable once registered, so meshes and textures are
/// uploaded at most once per id. Object slots are rewritten every frame
/// (instance transforms may animate) and grow to the instance count.
#[derive(Default)]
pub(crate) struct ResourceCache {
    meshes: HashMap<usize, MeshBuffers>,
    textures: HashMap<usize, wgpu::TextureView>,
    material_sampler: Option<wgpu::Sampler>,

    object_bgl: Option<wgpu::BindGroupLayout>,
    object_slots: Vec<ObjectSlot>,
}

impl ResourceCache {
    /// Uploads the mesh for `id` if needed. Returns false for unknown ids.
    pub(crate) fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, scene: &Scene, id: MeshId) -> bool {
        if self.meshes.contains_key(&id.0) {
            return true;
        }
        let Some(mesh) = scene.mesh(id) else {
            return false;
        };

        let raw: Vec<crate::mesh::RawVertex> = mesh.vertices.iter().map(|v| v.to_raw()).collect();
        let vbuf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shamash mesh vbuf"),
                contents: bytemuck::cast_slice(&raw),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let ibuf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shamash mesh ibuf"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.insert(
            id.0,
            MeshBuffers {
                vbuf,
                ibuf,
                index_count: mesh.indices.len() as u32,
            },
        );
        true
    }

    pub(crate) fn mesh(&self, id: MeshId) -> Option<&MeshBuffers> {
        self.meshes.get(&id.0)
    }

    /// Uploads the texture for `id` if needed. Returns false for unknown ids.
    pub(crate) fn ensure_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        scene: &Scene,
        id: TextureId,
    ) -> bool {
        if self.textures.contains_key(&id.0) {
            return true;
        }
        let Some(data) = scene.texture(id) else {
            return false;
        };

        let texture = data.upload(ctx.device, ctx.queue);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.insert(id.0, view);
        true
    }

    pub(crate) fn texture_view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.textures.get(&id.0)
    }

    /// Trilinear repeat sampler used by every material, mirroring the sample's
    /// original sampler configuration.
    pub(crate) fn material_sampler(&mut self, ctx: &RenderCtx<'_>) -> &wgpu::Sampler {
        self.material_sampler.get_or_insert_with(|| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("shamash material sampler"),
                address_mode_u: wgpu::AddressMode::Repeat,
                address_mode_v: wgpu::AddressMode::Repeat,
                address_mode_w: wgpu::AddressMode::Repeat,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Linear,
                ..Default::default()
            })
        })
    }

    pub(crate) fn material_sampler_ref(&self) -> Option<&wgpu::Sampler> {
        self.material_sampler.as_ref()
    }

    /// Bind group layout for per-draw object uniforms (group 2 in the PBR
    /// pipeline, group 1 in the shadow pipeline).
    pub(crate) fn object_bgl(&mut self, ctx: &RenderCtx<'_>) -> &wgpu::BindGroupLayout {
        self.object_bgl.get_or_insert_with(|| {
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("shamash object bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<ObjectUniforms>() as u64,
                            ),
                        },
                        count: None,
                    }],
                })
        })
    }

    pub(crate) fn object_bgl_ref(&self) -> Option<&wgpu::BindGroupLayout> {
        self.object_bgl.as_ref()
    }

    /// Writes one uniform slot per entry in `models`, growing the slot pool
    /// as needed. Slot `i` corresponds to `models[i]`.
    pub(crate) fn prepare_object_slots(&mut self, ctx: &RenderCtx<'_>, models: &[Mat4]) {
        // Layout creation must precede slot creation (borrow discipline).
        self.object_bgl(ctx);
        let Some(bgl) = self.object_bgl.as_ref() else {
            return;
        };

        while self.object_slots.len() < models.len() {
            let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("shamash object ubo"),
                size: std::mem::size_of::<ObjectUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("shamash object bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.object_slots.push(ObjectSlot { buffer, bind_group });
        }

        for (slot, model) in self.object_slots.iter().zip(models.iter()) {
            ctx.queue.write_buffer(
                &slot.buffer,
                0,
                bytemuck::bytes_of(&ObjectUniforms::from_model(*model)),
            );
        }
    }

    pub(crate) fn object_slot(&self, index: usize) -> Option<&ObjectSlot> {
        self.object_slots.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let u = ObjectUniforms::from_model(model);
        let nm = Mat4::from_cols_array_2d(&u.normal_matrix);
        // A +X normal under non-uniform x-scale must shrink, not grow.
        let n = nm.transform_vector3(Vec3::X);
        assert!((n.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn singular_model_falls_back_to_identity() {
        let u = ObjectUniforms::from_model(Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0)));
        assert_eq!(
            Mat4::from_cols_array_2d(&u.normal_matrix),
            Mat4::IDENTITY
        );
    }
}
