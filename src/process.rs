//! Point-wise color transforms.
//!
//! Every function here makes one forward pass over the buffer and computes
//! each output pixel from the same input pixel only. Alpha is preserved by
//! everything except the threshold pair, which writes the full replacement
//! color.

use crate::basics::{lerp, round_u8};
use crate::color::{OrderBgra, Rgba, Rgba8};
use crate::curves::{
    ChannelCurve, CurveBrightness, CurveContrast, CurveGamma, CurveInvert, CurveLut,
    CurveQuantize,
};
use crate::pixel_buffer::PixelBuffer;

const BPP: usize = OrderBgra::N;

/// Luma weights: red, green, blue.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.113];

/// Weighted luma of a pixel, rounded to a byte.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    round_u8(
        LUMA_WEIGHTS[0] * r as f64 + LUMA_WEIGHTS[1] * g as f64 + LUMA_WEIGHTS[2] * b as f64,
    )
}

/// Replace R, G and B with the pixel's luma.
pub fn grayscale(buf: &mut PixelBuffer) {
    for p in buf.data_mut().chunks_exact_mut(BPP) {
        let v = luma(p[OrderBgra::R], p[OrderBgra::G], p[OrderBgra::B]);
        p[OrderBgra::R] = v;
        p[OrderBgra::G] = v;
        p[OrderBgra::B] = v;
    }
}

/// Mean of R, G and B normalized to `[0, 1]`.
#[inline]
fn average(p: &[u8]) -> f64 {
    (p[OrderBgra::R] as u32 + p[OrderBgra::G] as u32 + p[OrderBgra::B] as u32) as f64 / 765.0
}

/// Overwrite every pixel whose channel average is strictly below `t` with
/// `color`. Pixels at or above `t` are left as they are.
pub fn threshold(buf: &mut PixelBuffer, t: f64, color: &Rgba) {
    let c = Rgba8::from_rgba(color);
    for p in buf.data_mut().chunks_exact_mut(BPP) {
        if average(p) < t {
            c.write_bgra(p);
        }
    }
}

/// Overwrite every pixel whose channel average is strictly above `t` with
/// `color`.
pub fn reverse_threshold(buf: &mut PixelBuffer, t: f64, color: &Rgba) {
    let c = Rgba8::from_rgba(color);
    for p in buf.data_mut().chunks_exact_mut(BPP) {
        if average(p) > t {
            c.write_bgra(p);
        }
    }
}

/// Apply an arbitrary channel curve to R, G and B.
pub fn apply_curve<C: ChannelCurve + ?Sized>(buf: &mut PixelBuffer, curve: &C) {
    CurveLut::from_curve(curve).apply_rgb(buf);
}

/// Snap each channel to the nearest of `levels` evenly spaced values.
pub fn quantize(buf: &mut PixelBuffer, levels: u32) {
    apply_curve(buf, &CurveQuantize::new(levels));
}

/// `out = 255 * (in / 255)^(1 / g)`.
pub fn gamma(buf: &mut PixelBuffer, g: f64) {
    apply_curve(buf, &CurveGamma::new(g));
}

/// `out = 255 - in` for R, G and B.
pub fn invert(buf: &mut PixelBuffer) {
    apply_curve(buf, &CurveInvert);
}

/// Contrast correction; `amount` 0 is the identity, positive increases contrast.
pub fn contrast(buf: &mut PixelBuffer, amount: f64) {
    apply_curve(buf, &CurveContrast::new(amount));
}

/// `out = clamp(in + 255 * amount)`.
pub fn brightness(buf: &mut PixelBuffer, amount: f64) {
    apply_curve(buf, &CurveBrightness::new(amount));
}

/// Move every channel toward `color` by factor `t` (0 = unchanged, 1 = `color`).
pub fn tint(buf: &mut PixelBuffer, color: &Rgba, t: f64) {
    let target = [color.b * 255.0, color.g * 255.0, color.r * 255.0];
    for p in buf.data_mut().chunks_exact_mut(BPP) {
        for (ch, &to) in p[..3].iter_mut().zip(target.iter()) {
            *ch = round_u8(lerp(*ch as f64, to, t));
        }
    }
}

/// Tint toward the fully saturated color at `hue` degrees.
pub fn hue(buf: &mut PixelBuffer, hue: f64, t: f64) {
    tint(buf, &Rgba::from_hsv(hue, 1.0, 1.0), t);
}

/// Grayscale, then map luma through the two-color gradient `from` → `to`.
pub fn map_gradient(buf: &mut PixelBuffer, from: &Rgba, to: &Rgba) {
    map_luma(buf, |l| from.gradient(to, l));
}

/// Grayscale, then map luma through the hue range `from` → `to` (degrees)
/// at full saturation and value.
pub fn map_hue(buf: &mut PixelBuffer, from: f64, to: f64) {
    map_luma(buf, |l| Rgba::from_hsv(lerp(from, to, l), 1.0, 1.0));
}

fn map_luma<F: Fn(f64) -> Rgba>(buf: &mut PixelBuffer, f: F) {
    grayscale(buf);
    // One color per luma value; the map only depends on the byte.
    let mut table = [Rgba8::TRANSPARENT; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = Rgba8::from_rgba(&f(i as f64 / 255.0));
    }
    for p in buf.data_mut().chunks_exact_mut(BPP) {
        let c = table[p[OrderBgra::R] as usize];
        c.with_alpha(p[OrderBgra::A]).write_bgra(p);
    }
}

// ============================================================================
// Tests
// ============================================================================
