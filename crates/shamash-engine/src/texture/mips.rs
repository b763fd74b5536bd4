/// Number of mip levels for a full chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Produces the next mip level of an RGBA8 image by 2x2 box filtering.
///
/// Odd dimensions floor-divide; the last row/column then samples a 1-wide
/// window. Returns the new dimensions and pixels.
pub(super) fn downsample_rgba8(width: u32, height: u32, pixels: &[u8]) -> (u32, u32, Vec<u8>) {
    debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

    let nw = (width / 2).max(1);
    let nh = (height / 2).max(1);
    let mut out = Vec::with_capacity((nw * nh * 4) as usize);

    for y in 0..nh {
        for x in 0..nw {
            let x0 = (x * 2).min(width - 1);
            let x1 = (x * 2 + 1).min(width - 1);
            let y0 = (y * 2).min(height - 1);
            let y1 = (y * 2 + 1).min(height - 1);

            for c in 0..4 {
                let sum = sample(pixels, width, x0, y0, c)
                    + sample(pixels, width, x1, y0, c)
                    + sample(pixels, width, x0, y1, c)
                    + sample(pixels, width, x1, y1, c);
                out.push(((sum + 2) / 4) as u8);
            }
        }
    }

    (nw, nh, out)
}

#[inline]
fn sample(pixels: &[u8], width: u32, x: u32, y: u32, channel: u32) -> u32 {
    pixels[((y * width + x) * 4 + channel) as usize] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── level count ───────────────────────────────────────────────────────

    #[test]
    fn level_count_for_powers_of_two() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(1024, 512), 11);
    }

    #[test]
    fn level_count_for_npot() {
        assert_eq!(mip_level_count(3, 3), 2);
        assert_eq!(mip_level_count(640, 480), 10);
    }

    // ── downsampling ──────────────────────────────────────────────────────

    #[test]
    fn two_by_two_averages_to_one_pixel() {
        // One pixel per corner; averaging rounds to nearest.
        let pixels = [
            0, 0, 0, 255, //
            100, 0, 0, 255, //
            0, 200, 0, 255, //
            0, 0, 40, 255,
        ];
        let (w, h, out) = downsample_rgba8(2, 2, &pixels);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, vec![25, 50, 10, 255]);
    }

    #[test]
    fn odd_width_clamps_last_column() {
        let pixels: Vec<u8> = (0..3 * 1 * 4).map(|i| (i * 10) as u8).collect();
        let (w, h, out) = downsample_rgba8(3, 1, &pixels);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn chain_terminates_at_one_by_one() {
        let mut w = 640u32;
        let mut h = 480u32;
        let mut pixels = vec![128u8; (w * h * 4) as usize];
        let mut levels = 1;
        while w > 1 || h > 1 {
            let (nw, nh, np) = downsample_rgba8(w, h, &pixels);
            w = nw;
            h = nh;
            pixels = np;
            levels += 1;
        }
        assert_eq!(levels, mip_level_count(640, 480));
        assert_eq!(pixels.len(), 4);
        // A constant image stays constant through the chain.
        assert_eq!(pixels[0], 128);
    }
}
