//! Convolution filters: box blur, Gaussian blur, and sharpen.
//!
//! Both blurs are separable two-pass filters. The horizontal pass reads the
//! buffer and writes a scratch buffer; the vertical pass reads the scratch
//! buffer and writes the result back. Neighbor reads go through
//! [`ImageAccessorClone`], so samples past an edge replicate the edge pixel
//! and a uniform field stays uniform however large the radius.
//!
//! A radius below 1 is a no-op for both blurs.

use crate::basics::{clamp_u8, round_u8};
use crate::color::Rgba8;
use crate::image_accessors::ImageAccessorClone;
use crate::pixel_buffer::PixelBuffer;

// ============================================================================
// Box blur
// ============================================================================

/// Integer mean of `n` channel sums, rounded to nearest.
#[inline]
fn mean(sum: u64, n: u64) -> u8 {
    ((sum + n / 2) / n) as u8
}

/// Splits the window `[c - radius, c + radius]` over a line of `len` samples
/// into `(before, first, count, after)`: `before` taps clamp to sample 0,
/// `count` taps read samples `first..first + count`, and `after` taps clamp to
/// sample `len - 1`.
#[inline]
fn clamped_window(c: i32, radius: i32, len: i32) -> (u64, i32, u32, u64) {
    let lo = c as i64 - radius as i64;
    let hi = c as i64 + radius as i64;
    let last = len as i64 - 1;
    let before = (-lo).max(0) as u64;
    let after = (hi - last).max(0) as u64;
    let first = lo.max(0);
    let count = hi.min(last) - first + 1;
    (before, first as i32, count as u32, after)
}

#[inline]
fn add_weighted(sum: &mut [u64; 3], c: Rgba8, n: u64) {
    sum[0] += c.r as u64 * n;
    sum[1] += c.g as u64 * n;
    sum[2] += c.b as u64 * n;
}

/// Two-pass separable mean filter over a `2 * radius + 1` window.
///
/// Taps past an edge count the edge pixel once per tap, so the cost per pixel
/// is bounded by the image size, not by the radius. Output alpha is forced
/// to 255.
pub fn box_blur(buf: &mut PixelBuffer, radius: i32) {
    if radius < 1 || buf.width() == 0 || buf.height() == 0 {
        return;
    }
    log::trace!("box_blur {}x{} r={}", buf.width(), buf.height(), radius);
    let w = buf.width() as i32;
    let h = buf.height() as i32;
    let taps = radius as u64 * 2 + 1;

    // Horizontal pass
    let mut scratch = PixelBuffer::new(buf.width(), buf.height());
    {
        let mut acc = ImageAccessorClone::new(buf);
        for y in 0..h {
            for x in 0..w {
                let (before, first, count, after) = clamped_window(x, radius, w);
                let mut sum = [0u64; 3];
                add_weighted(&mut sum, acc.pixel(0, y), before);
                add_weighted(&mut sum, acc.pixel(w - 1, y), after);
                let mut c = acc.span(first, y, count);
                for i in 0..count {
                    if i > 0 {
                        c = acc.next_x();
                    }
                    add_weighted(&mut sum, c, 1);
                }
                scratch.set_pixel_int(
                    x,
                    y,
                    Rgba8::new_opaque(mean(sum[0], taps), mean(sum[1], taps), mean(sum[2], taps)),
                );
            }
        }
    }

    // Vertical pass
    let mut acc = ImageAccessorClone::new(&scratch);
    for x in 0..w {
        for y in 0..h {
            let (before, first, count, after) = clamped_window(y, radius, h);
            let mut sum = [0u64; 3];
            add_weighted(&mut sum, acc.pixel(x, 0), before);
            add_weighted(&mut sum, acc.pixel(x, h - 1), after);
            let mut c = acc.span(x, first, 1);
            for i in 0..count {
                if i > 0 {
                    c = acc.next_y();
                }
                add_weighted(&mut sum, c, 1);
            }
            buf.set_pixel_int(
                x,
                y,
                Rgba8::new_opaque(mean(sum[0], taps), mean(sum[1], taps), mean(sum[2], taps)),
            );
        }
    }
}

// ============================================================================
// Gaussian blur
// ============================================================================

/// Largest radius [`gaussian_blur`] honors; larger radii blur as this one.
pub const MAX_GAUSSIAN_RADIUS: i32 = 4096;

/// Normalized 1-D Gaussian kernel of `2 * radius + 1` weights with
/// `sigma = (size - 1) / 5`. A radius below 1 yields the single weight `[1.0]`;
/// a radius above [`MAX_GAUSSIAN_RADIUS`] is reduced to it.
pub fn gaussian_kernel(radius: i32) -> Vec<f64> {
    if radius < 1 {
        return vec![1.0];
    }
    let radius = radius.min(MAX_GAUSSIAN_RADIUS);
    let size = radius as usize * 2 + 1;
    let sigma = (size - 1) as f64 / 5.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

#[inline]
fn accumulate(sum: &mut [f64; 4], c: Rgba8, k: f64) {
    sum[0] += c.r as f64 * k;
    sum[1] += c.g as f64 * k;
    sum[2] += c.b as f64 * k;
    sum[3] += c.a as f64 * k;
}

#[inline]
fn to_pixel(sum: &[f64; 4]) -> Rgba8 {
    Rgba8::new(
        round_u8(sum[0]),
        round_u8(sum[1]),
        round_u8(sum[2]),
        round_u8(sum[3]),
    )
}

/// Two-pass separable Gaussian blur. Alpha is blurred with the color channels.
pub fn gaussian_blur(buf: &mut PixelBuffer, radius: i32) {
    if radius < 1 || buf.width() == 0 || buf.height() == 0 {
        return;
    }
    let radius = radius.min(MAX_GAUSSIAN_RADIUS);
    log::trace!("gaussian_blur {}x{} r={}", buf.width(), buf.height(), radius);
    let kernel = gaussian_kernel(radius);
    let taps = kernel.len() as u32;
    let w = buf.width() as i32;
    let h = buf.height() as i32;

    // Horizontal pass
    let mut scratch = PixelBuffer::new(buf.width(), buf.height());
    {
        let mut acc = ImageAccessorClone::new(buf);
        for y in 0..h {
            for x in 0..w {
                let mut sum = [0.0f64; 4];
                accumulate(&mut sum, acc.span(x - radius, y, taps), kernel[0]);
                for &k in &kernel[1..] {
                    accumulate(&mut sum, acc.next_x(), k);
                }
                scratch.set_pixel_int(x, y, to_pixel(&sum));
            }
        }
    }

    // Vertical pass
    let mut acc = ImageAccessorClone::new(&scratch);
    for x in 0..w {
        for y in 0..h {
            let mut sum = [0.0f64; 4];
            accumulate(&mut sum, acc.span(x, y - radius, 1), kernel[0]);
            for &k in &kernel[1..] {
                accumulate(&mut sum, acc.next_y(), k);
            }
            buf.set_pixel_int(x, y, to_pixel(&sum));
        }
    }
}

// ============================================================================
// Sharpen
// ============================================================================

/// 3×3 sharpen kernel, row-major.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Apply [`SHARPEN_KERNEL`] to R, G and B with edge-clamped sampling.
/// Alpha is copied from the source pixel.
pub fn sharpen(buf: &mut PixelBuffer) {
    if buf.width() == 0 || buf.height() == 0 {
        return;
    }
    log::trace!("sharpen {}x{}", buf.width(), buf.height());
    let w = buf.width() as i32;
    let h = buf.height() as i32;
    let mut dst = PixelBuffer::new(buf.width(), buf.height());
    let acc = ImageAccessorClone::new(buf);
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0i32; 3];
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, &k) in row.iter().enumerate() {
                    if k == 0 {
                        continue;
                    }
                    let c = acc.pixel(x + kx as i32 - 1, y + ky as i32 - 1);
                    sum[0] += c.r as i32 * k;
                    sum[1] += c.g as i32 * k;
                    sum[2] += c.b as i32 * k;
                }
            }
            let a = acc.pixel(x, y).a;
            dst.set_pixel_int(
                x,
                y,
                Rgba8::new(
                    clamp_u8(sum[0]),
                    clamp_u8(sum[1]),
                    clamp_u8(sum[2]),
                    a,
                ),
            );
        }
    }
    *buf = dst;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(w: u32, h: u32, x: i32, y: i32) -> PixelBuffer {
        let mut buf = PixelBuffer::filled(w, h, Rgba8::new_opaque(0, 0, 0));
        buf.set_pixel_int(x, y, Rgba8::new_opaque(255, 255, 255));
        buf
    }

    #[test]
    fn test_box_blur_zero_and_negative_radius_noop() {
        let mut buf = spot(10, 10, 5, 5);
        buf.set_pixel_int(1, 1, Rgba8::new(10, 20, 30, 40));
        let before = buf.clone();
        box_blur(&mut buf, 0);
        assert_eq!(buf, before);
        box_blur(&mut buf, -1);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_box_blur_spreads_pixel() {
        let mut buf = spot(9, 9, 4, 4);
        box_blur(&mut buf, 1);
        // 255 / 9 ≈ 28 after both passes
        let center = buf.pixel_int(4, 4);
        assert_eq!(center.r, 28);
        assert_eq!(buf.pixel_int(5, 5).r, 28);
        assert_eq!(buf.pixel_int(6, 4).r, 0);
    }

    #[test]
    fn test_box_blur_forces_opaque() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba8::new(100, 100, 100, 10));
        box_blur(&mut buf, 2);
        for p in buf.pixels() {
            assert_eq!(p, Rgba8::new(100, 100, 100, 255));
        }
    }

    #[test]
    fn test_box_blur_large_radius_uniform() {
        let mut buf = PixelBuffer::filled(3, 3, Rgba8::new_opaque(0, 0, 0));
        box_blur(&mut buf, 5);
        for p in buf.pixels() {
            assert_eq!(p, Rgba8::new_opaque(0, 0, 0));
        }
    }

    #[test]
    fn test_box_blur_huge_radius() {
        let white = Rgba8::new_opaque(255, 255, 255);
        let mut buf = PixelBuffer::filled(1, 1, white);
        box_blur(&mut buf, 9_000_000);
        assert_eq!(buf.pixel_int(0, 0), white);

        let gray = Rgba8::new_opaque(77, 140, 203);
        let mut buf = PixelBuffer::filled(3, 2, gray);
        box_blur(&mut buf, i32::MAX);
        for p in buf.pixels() {
            assert_eq!(p, gray);
        }
    }

    #[test]
    fn test_box_blur_edge_taps_repeat_edge_pixel() {
        // window [-2, 2] at x = 0 holds the edge pixel three times
        let mut buf = spot(5, 1, 0, 0);
        box_blur(&mut buf, 2);
        assert_eq!(buf.pixel_int(0, 0).r, 153);
        assert_eq!(buf.pixel_int(2, 0).r, 51);
        assert_eq!(buf.pixel_int(4, 0).r, 0);
    }

    #[test]
    fn test_gaussian_huge_radius_is_capped() {
        let k = gaussian_kernel(i32::MAX);
        assert_eq!(k.len(), MAX_GAUSSIAN_RADIUS as usize * 2 + 1);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);

        let black = Rgba8::new_opaque(0, 0, 0);
        let mut buf = PixelBuffer::filled(3, 3, black);
        gaussian_blur(&mut buf, i32::MAX);
        for p in buf.pixels() {
            assert_eq!(p, black);
        }
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        for r in 1..20 {
            let k = gaussian_kernel(r);
            assert_eq!(k.len(), (2 * r + 1) as usize);
            let sum: f64 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "radius {r} sums to {sum}");
        }
        assert_eq!(gaussian_kernel(0), vec![1.0]);
        assert_eq!(gaussian_kernel(-3), vec![1.0]);
    }

    #[test]
    fn test_gaussian_kernel_symmetric_peak() {
        let k = gaussian_kernel(4);
        for i in 0..4 {
            assert!((k[i] - k[8 - i]).abs() < 1e-15);
            assert!(k[i] < k[i + 1]);
        }
    }

    #[test]
    fn test_gaussian_blur_noop_and_uniform() {
        let mut buf = spot(6, 6, 2, 2);
        let before = buf.clone();
        gaussian_blur(&mut buf, 0);
        assert_eq!(buf, before);

        let mut flat = PixelBuffer::filled(5, 5, Rgba8::new(40, 80, 120, 200));
        gaussian_blur(&mut flat, 6);
        for p in flat.pixels() {
            assert_eq!(p, Rgba8::new(40, 80, 120, 200));
        }
    }

    #[test]
    fn test_gaussian_blur_blurs_alpha() {
        let mut buf = PixelBuffer::new(9, 1);
        buf.set_pixel_int(4, 0, Rgba8::new(255, 255, 255, 255));
        gaussian_blur(&mut buf, 2);
        let c = buf.pixel_int(4, 0);
        assert!(c.a < 255 && c.a > 0);
        assert!(buf.pixel_int(3, 0).a > 0);
        assert_eq!(buf.pixel_int(0, 0).a, 0);
    }

    #[test]
    fn test_sharpen_uniform_unchanged() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba8::new(90, 60, 30, 128));
        sharpen(&mut buf);
        for p in buf.pixels() {
            assert_eq!(p, Rgba8::new(90, 60, 30, 128));
        }
    }

    #[test]
    fn test_sharpen_boosts_spot_and_clamps() {
        let mut buf = PixelBuffer::filled(5, 5, Rgba8::new_opaque(100, 100, 100));
        buf.set_pixel_int(2, 2, Rgba8::new_opaque(150, 150, 150));
        sharpen(&mut buf);
        // 5*150 - 4*100 = 350 -> 255
        assert_eq!(buf.pixel_int(2, 2).r, 255);
        // 5*100 - 150 - 3*100 = 50
        assert_eq!(buf.pixel_int(2, 1).r, 50);
        assert_eq!(buf.pixel_int(0, 0).r, 100);
    }
}
