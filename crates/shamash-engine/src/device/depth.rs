use winit::dpi::PhysicalSize;

/// Depth format used by every depth-tested pass in the renderer.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth buffer paired with the surface.
///
/// Recreated on resize; dimensions must always match the surface
/// configuration or render passes will reject the attachment combination.
pub(super) struct DepthBuffer {
    view: wgpu::TextureView,
}

impl DepthBuffer {
    pub(super) fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shamash depth buffer"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view }
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
