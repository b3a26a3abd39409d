//! Error-diffusion dithering to 1-bit black and white.
//!
//! The buffer is converted to grayscale, then swept once in raster order.
//! Each pixel is quantized to 0 or 255 and the quantization error is pushed
//! into neighbors that have not been visited yet, as described by the
//! selected [`DitherKernel`]. Every offset has `dy >= 0`, and same-row
//! offsets have `dx > 0`, so the sweep must stay sequential.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::OrderBgra;
use crate::pixel_buffer::PixelBuffer;
use crate::process::grayscale;

/// One error-distribution tap: `(dx, dy, weight)`. The weight is a numerator
/// over the kernel's [`denominator`](DitherKernel::denominator).
pub type DiffusionTap = (i32, i32, i32);

/// Error-diffusion kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DitherKernel {
    /// Six equal taps over three rows. Only 6/8 of the error is diffused,
    /// which keeps highlights and shadows crisp.
    Atkinson,
    #[default]
    FloydSteinberg,
    /// Jarvis, Judice and Ninke.
    Jjn,
    Sierra,
    Stucki,
}

const ATKINSON: [DiffusionTap; 6] = [
    (1, 0, 1),
    (2, 0, 1),
    (-1, 1, 1),
    (0, 1, 1),
    (1, 1, 1),
    (0, 2, 1),
];

const FLOYD_STEINBERG: [DiffusionTap; 4] = [(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)];

const JJN: [DiffusionTap; 12] = [
    (1, 0, 7),
    (2, 0, 5),
    (-2, 1, 3),
    (-1, 1, 5),
    (0, 1, 7),
    (1, 1, 5),
    (2, 1, 3),
    (-2, 2, 1),
    (-1, 2, 3),
    (0, 2, 5),
    (1, 2, 3),
    (2, 2, 1),
];

const SIERRA: [DiffusionTap; 10] = [
    (1, 0, 5),
    (2, 0, 3),
    (-2, 1, 2),
    (-1, 1, 4),
    (0, 1, 5),
    (1, 1, 4),
    (2, 1, 2),
    (-1, 2, 2),
    (0, 2, 3),
    (1, 2, 2),
];

const STUCKI: [DiffusionTap; 12] = [
    (1, 0, 8),
    (2, 0, 4),
    (-2, 1, 2),
    (-1, 1, 4),
    (0, 1, 8),
    (1, 1, 4),
    (2, 1, 2),
    (-2, 2, 1),
    (-1, 2, 2),
    (0, 2, 4),
    (1, 2, 2),
    (2, 2, 1),
];

impl DitherKernel {
    pub const ALL: [DitherKernel; 5] = [
        DitherKernel::Atkinson,
        DitherKernel::FloydSteinberg,
        DitherKernel::Jjn,
        DitherKernel::Sierra,
        DitherKernel::Stucki,
    ];

    pub fn taps(&self) -> &'static [DiffusionTap] {
        match self {
            DitherKernel::Atkinson => &ATKINSON,
            DitherKernel::FloydSteinberg => &FLOYD_STEINBERG,
            DitherKernel::Jjn => &JJN,
            DitherKernel::Sierra => &SIERRA,
            DitherKernel::Stucki => &STUCKI,
        }
    }

    pub fn denominator(&self) -> i32 {
        match self {
            DitherKernel::Atkinson => 8,
            DitherKernel::FloydSteinberg => 16,
            DitherKernel::Jjn => 48,
            DitherKernel::Sierra => 32,
            DitherKernel::Stucki => 42,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DitherKernel::Atkinson => "atkinson",
            DitherKernel::FloydSteinberg => "floyd_steinberg",
            DitherKernel::Jjn => "jjn",
            DitherKernel::Sierra => "sierra",
            DitherKernel::Stucki => "stucki",
        }
    }
}

/// Push `err` from `(x, y)` into the forward neighbors named by `kernel`.
/// Each neighbor receives `err * weight / denominator`; taps that fall
/// outside `width × height` are dropped.
pub fn diffuse_error(
    grays: &mut [i32],
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    err: i32,
    kernel: DitherKernel,
) {
    let den = kernel.denominator();
    for &(dx, dy, weight) in kernel.taps() {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= width || ny < 0 || ny >= height {
            continue;
        }
        grays[(ny * width + nx) as usize] += err * weight / den;
    }
}

/// Dither `buf` to pure black and white with `kernel`. Alpha is untouched.
pub fn dither(buf: &mut PixelBuffer, kernel: DitherKernel) {
    log::debug!(
        "dither {}x{} kernel={}",
        buf.width(),
        buf.height(),
        kernel.name()
    );
    grayscale(buf);
    let width = buf.width() as i32;
    let height = buf.height() as i32;

    let mut grays: Vec<i32> = buf
        .data()
        .chunks_exact(OrderBgra::N)
        .map(|p| p[OrderBgra::B] as i32)
        .collect();

    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) as usize;
            let old = grays[i];
            let new = if old > 127 { 255 } else { 0 };
            grays[i] = new;
            diffuse_error(&mut grays, width, height, x, y, old - new, kernel);
        }
    }

    for (p, &g) in buf.data_mut().chunks_exact_mut(OrderBgra::N).zip(grays.iter()) {
        let v = g as u8;
        p[OrderBgra::B] = v;
        p[OrderBgra::G] = v;
        p[OrderBgra::R] = v;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;

    #[test]
    fn test_taps_only_reach_forward() {
        for kernel in DitherKernel::ALL {
            for &(dx, dy, _) in kernel.taps() {
                assert!(dy >= 0, "{:?}", kernel);
                if dy == 0 {
                    assert!(dx > 0, "{:?}", kernel);
                }
            }
        }
    }

    #[test]
    fn test_weights_sum_to_denominator() {
        for kernel in DitherKernel::ALL {
            let sum: i32 = kernel.taps().iter().map(|t| t.2).sum();
            if kernel == DitherKernel::Atkinson {
                assert_eq!(sum, 6);
            } else {
                assert_eq!(sum, kernel.denominator(), "{:?}", kernel);
            }
        }
    }

    #[test]
    fn test_tap_counts() {
        assert_eq!(DitherKernel::Atkinson.taps().len(), 6);
        assert_eq!(DitherKernel::FloydSteinberg.taps().len(), 4);
        assert_eq!(DitherKernel::Jjn.taps().len(), 12);
        assert_eq!(DitherKernel::Sierra.taps().len(), 10);
        assert_eq!(DitherKernel::Stucki.taps().len(), 12);
    }

    #[test]
    fn test_floyd_steinberg_conserves_error() {
        let mut grays = vec![0i32; 7 * 7];
        diffuse_error(&mut grays, 7, 7, 3, 3, 160, DitherKernel::FloydSteinberg);
        assert_eq!(grays[3 * 7 + 4], 70);
        assert_eq!(grays[4 * 7 + 2], 30);
        assert_eq!(grays[4 * 7 + 3], 50);
        assert_eq!(grays[4 * 7 + 4], 10);
        assert_eq!(grays.iter().sum::<i32>(), 160);
    }

    #[test]
    fn test_out_of_bounds_taps_dropped() {
        let mut grays = vec![0i32; 4];
        diffuse_error(&mut grays, 2, 2, 1, 1, 100, DitherKernel::Stucki);
        assert!(grays.iter().all(|&g| g == 0));
    }

    #[test]
    fn test_dither_output_is_binary_and_keeps_alpha() {
        for kernel in DitherKernel::ALL {
            let mut buf = PixelBuffer::new(16, 16);
            buf.process_pixels(|x, y, _| {
                let v = (x * 16) as u8;
                Rgba8::new(v, v, (y * 8) as u8, 200)
            });
            dither(&mut buf, kernel);
            for p in buf.pixels() {
                assert!(p.r == 0 || p.r == 255, "{:?}", kernel);
                assert_eq!(p.r, p.g);
                assert_eq!(p.g, p.b);
                assert_eq!(p.a, 200);
            }
        }
    }

    #[test]
    fn test_dither_mid_gray_mixes() {
        let mut buf = PixelBuffer::filled(32, 32, Rgba8::new_opaque(128, 128, 128));
        dither(&mut buf, DitherKernel::FloydSteinberg);
        let white = buf.pixels().filter(|p| p.r == 255).count();
        assert!(white > 300 && white < 724, "white count {white}");
    }

    #[test]
    fn test_dither_extremes_fixed() {
        let mut black = PixelBuffer::filled(5, 5, Rgba8::new_opaque(0, 0, 0));
        dither(&mut black, DitherKernel::Jjn);
        assert!(black.pixels().all(|p| p.r == 0));
        let mut white = PixelBuffer::filled(5, 5, Rgba8::new_opaque(255, 255, 255));
        dither(&mut white, DitherKernel::Sierra);
        assert!(white.pixels().all(|p| p.r == 255));
    }
}
