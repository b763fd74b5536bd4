use anyhow::{Context, Result};

use super::mips::{downsample_rgba8, mip_level_count};

/// Color space of the stored pixels.
///
/// Albedo maps are authored in sRGB; normal/metallic/roughness maps hold
/// linear data. The distinction selects the GPU texture format, so sampling
/// returns linear values either way.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

/// Decoded RGBA8 image ready for upload.
///
/// Immutable once registered with a scene; the renderer uploads it at most
/// once per texture id.
#[derive(Debug, Clone)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    color_space: ColorSpace,
}

impl TextureData {
    /// Wraps raw RGBA8 pixels.
    ///
    /// # Panics
    /// Panics (debug only) if `pixels` does not match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>, color_space: ColorSpace) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
            color_space,
        }
    }

    /// Decodes an encoded image (PNG/JPEG) from memory.
    pub fn decode(bytes: &[u8], color_space: ColorSpace) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .context("failed to decode image")?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            pixels: img.into_raw(),
            color_space,
        })
    }

    /// Checkerboard in sRGB, `cell` pixels per square.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let c = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&[c[0], c[1], c[2], 255]);
            }
        }
        Self::from_rgba8(size, size, pixels, ColorSpace::Srgb)
    }

    /// 1x1 constant texture.
    pub fn solid(value: [u8; 4], color_space: ColorSpace) -> Self {
        Self::from_rgba8(1, 1, value.to_vec(), color_space)
    }

    /// 1x1 "straight up" tangent-space normal.
    pub fn flat_normal() -> Self {
        Self::solid([128, 128, 255, 255], ColorSpace::Linear)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Uploads the image with a full mip chain and returns the texture.
    ///
    /// Mips are generated on the CPU by 2x2 box filtering; each level is
    /// written with `COPY_BYTES_PER_ROW_ALIGNMENT`-padded rows.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
        let format = match self.color_space {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        };
        let mip_count = mip_level_count(self.width, self.height);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shamash material texture"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut level = 0;
        let mut w = self.width;
        let mut h = self.height;
        let mut pixels = std::borrow::Cow::Borrowed(self.pixels.as_slice());

        loop {
            write_rgba8_level(queue, &texture, level, w, h, &pixels);
            level += 1;
            if level >= mip_count {
                break;
            }
            let (nw, nh, np) = downsample_rgba8(w, h, &pixels);
            w = nw;
            h = nh;
            pixels = std::borrow::Cow::Owned(np);
        }

        texture
    }
}

/// Writes one RGBA8 mip level, padding `bytes_per_row` to the wgpu copy
/// alignment when needed.
fn write_rgba8_level(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    level: u32,
    w: u32,
    h: u32,
    pixels: &[u8],
) {
    let row_bytes = 4 * w;
    let padded = padded_bytes_per_row(row_bytes);

    let copy = wgpu::TexelCopyTextureInfo {
        texture,
        mip_level: level,
        origin: wgpu::Origin3d::ZERO,
        aspect: wgpu::TextureAspect::All,
    };
    let extent = wgpu::Extent3d {
        width: w,
        height: h,
        depth_or_array_layers: 1,
    };

    if padded == row_bytes {
        queue.write_texture(
            copy,
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row_bytes),
                rows_per_image: Some(h),
            },
            extent,
        );
        return;
    }

    let mut staged = vec![0u8; (padded * h) as usize];
    for y in 0..h as usize {
        let src = &pixels[y * row_bytes as usize..(y + 1) * row_bytes as usize];
        staged[y * padded as usize..y * padded as usize + row_bytes as usize].copy_from_slice(src);
    }
    queue.write_texture(
        copy,
        &staged,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(padded),
            rows_per_image: Some(h),
        },
        extent,
    );
}

/// Rounds `row_bytes` up to `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub(crate) fn padded_bytes_per_row(row_bytes: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    row_bytes.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── decode ────────────────────────────────────────────────────────────

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_from_memory() {
        let bytes = png_bytes(4, 2, [10, 20, 30, 255]);
        let tex = TextureData::decode(&bytes, ColorSpace::Linear).unwrap();
        assert_eq!((tex.width(), tex.height()), (4, 2));
        assert_eq!(&tex.pixels()[0..4], &[10, 20, 30, 255]);
        assert_eq!(tex.color_space(), ColorSpace::Linear);
    }

    #[test]
    fn malformed_bytes_are_an_error() {
        assert!(TextureData::decode(b"definitely not an image", ColorSpace::Srgb).is_err());
    }

    // ── procedural ────────────────────────────────────────────────────────

    #[test]
    fn checkerboard_alternates_cells() {
        let tex = TextureData::checkerboard(4, 2, [255, 0, 0], [0, 0, 255]);
        let px = |x: u32, y: u32| {
            let i = ((y * 4 + x) * 4) as usize;
            &tex.pixels()[i..i + 3]
        };
        assert_eq!(px(0, 0), &[255, 0, 0]);
        assert_eq!(px(2, 0), &[0, 0, 255]);
        assert_eq!(px(0, 2), &[0, 0, 255]);
        assert_eq!(px(2, 2), &[255, 0, 0]);
    }

    #[test]
    fn flat_normal_points_up() {
        let tex = TextureData::flat_normal();
        assert_eq!(tex.pixels(), &[128, 128, 255, 255]);
        assert_eq!(tex.color_space(), ColorSpace::Linear);
    }

    // ── upload math ───────────────────────────────────────────────────────

    #[test]
    fn row_padding_respects_copy_alignment() {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        assert_eq!(padded_bytes_per_row(align), align);
        assert_eq!(padded_bytes_per_row(align + 1), 2 * align);
        // A 3-pixel-wide RGBA row (12 bytes) pads up to one alignment unit.
        assert_eq!(padded_bytes_per_row(12), align);
    }
}
