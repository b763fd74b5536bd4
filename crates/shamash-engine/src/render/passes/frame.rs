use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::camera::Camera;
use crate::render::RenderCtx;
use crate::scene::Scene;

/// Per-frame uniforms shared by the PBR and ground passes (group 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_from_world: [[f32; 4]; 4],
    /// xyz: camera position, w: exposure.
    pub camera_pos: [f32; 4],
    /// xyz: normalized sun travel direction, w: unused.
    pub sun_direction: [f32; 4],
    /// rgb: linear sun color, w: illuminance (lx). Zero intensity = no sun.
    pub sun_color: [f32; 4],
    /// rgb: linear ambient tint, w: illuminance (lx).
    pub ambient: [f32; 4],
    /// x: shadow texel size, y: PCF kernel radius in texels.
    pub shadow_params: [f32; 4],
}

impl FrameUniforms {
    pub(crate) fn build(
        scene: &Scene,
        camera: &Camera,
        aspect: f32,
        light_from_world: Mat4,
        shadow_texel: f32,
    ) -> Self {
        let (sun_direction, sun_color, pcf_radius) = match scene.sun() {
            Some(sun) => {
                let d = sun.direction_normalized();
                // The wider the disc, the softer the shadow edge.
                let radius = (1.0 + sun.angular_radius * 0.5).clamp(1.0, 3.0);
                (
                    [d.x, d.y, d.z, 0.0],
                    [sun.color.r, sun.color.g, sun.color.b, sun.intensity],
                    radius,
                )
            }
            None => ([0.0, -1.0, 0.0, 0.0], [0.0; 4], 1.0),
        };

        let env = scene.environment();
        let eye = camera.eye;

        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
            light_from_world: light_from_world.to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, camera.exposure()],
            sun_direction,
            sun_color,
            ambient: [env.color.r, env.color.g, env.color.b, env.intensity],
            shadow_params: [shadow_texel, pcf_radius, 0.0, 0.0],
        }
    }
}

/// Frame bind group: the uniforms above plus the shadow map + comparison
/// sampler. Built once (the shadow map is allocated once) and rewritten per
/// frame via the uniform buffer.
#[derive(Default)]
pub(crate) struct FrameResources {
    ubo: Option<wgpu::Buffer>,
    bgl: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
}

impl FrameResources {
    pub(crate) fn ensure(
        &mut self,
        ctx: &RenderCtx<'_>,
        shadow_view: &wgpu::TextureView,
        shadow_sampler: &wgpu::Sampler,
    ) {
        if self.bind_group.is_some() {
            return;
        }

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shamash frame bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<FrameUniforms>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
            });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shamash frame ubo"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shamash frame bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(shadow_sampler),
                },
            ],
        });

        self.ubo = Some(ubo);
        self.bgl = Some(bgl);
        self.bind_group = Some(bind_group);
    }

    pub(crate) fn write(&self, ctx: &RenderCtx<'_>, uniforms: &FrameUniforms) {
        if let Some(ubo) = self.ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniforms));
        }
    }

    pub(crate) fn bgl(&self) -> Option<&wgpu::BindGroupLayout> {
        self.bgl.as_ref()
    }

    pub(crate) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene::SunLight;
    use glam::Vec3;

    #[test]
    fn sunless_scene_uploads_zero_intensity() {
        let scene = Scene::new();
        let u = FrameUniforms::build(&scene, &Camera::new(), 1.0, Mat4::IDENTITY, 1.0 / 2048.0);
        assert_eq!(u.sun_color, [0.0; 4]);
        assert_eq!(u.shadow_params[1], 1.0);
    }

    #[test]
    fn sun_parameters_land_in_uniforms() {
        let mut scene = Scene::new();
        scene.set_sun(
            SunLight::new()
                .color(Color::new(1.0, 0.5, 0.25, 1.0))
                .intensity(110_000.0)
                .direction(Vec3::new(0.0, -2.0, 0.0))
                .angular_radius(1.9),
        );
        let u = FrameUniforms::build(&scene, &Camera::new(), 1.0, Mat4::IDENTITY, 1.0 / 2048.0);
        assert_eq!(u.sun_color, [1.0, 0.5, 0.25, 110_000.0]);
        assert_eq!(u.sun_direction[1], -1.0);
        // 1.9 degree disc widens the PCF kernel.
        assert!((u.shadow_params[1] - 1.95).abs() < 1e-5);
    }

    #[test]
    fn exposure_rides_with_the_camera_position() {
        let scene = Scene::new();
        let camera = Camera::new();
        let u = FrameUniforms::build(&scene, &camera, 1.0, Mat4::IDENTITY, 1.0 / 2048.0);
        assert_eq!(u.camera_pos[3], camera.exposure());
    }
}
