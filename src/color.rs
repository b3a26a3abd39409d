//! Color types and operations.
//!
//! - `Rgba`: f64 components in `[0, 1]`, the parameter type of every filter
//!   that takes a color.
//! - `Rgba8`: u8 components, the unit a `PixelBuffer` stores.
//! - `OrderBgra`: byte offsets of the packed pixel layout.
//!
//! Also provides the HSV conversion used by the hue filters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::basics::{lerp, u8_to_unit, unit_to_u8};

// ============================================================================
// Component order
// ============================================================================

/// BGRA component order: B=0, G=1, R=2, A=3.
///
/// This is the byte order of every pixel in a `PixelBuffer` (the native
/// little-endian ARGB32 layout of the surfaces the buffers are copied from).
pub struct OrderBgra;
impl OrderBgra {
    pub const B: usize = 0;
    pub const G: usize = 1;
    pub const R: usize = 2;
    pub const A: usize = 3;
    pub const N: usize = 4;
}

// ============================================================================
// Rgba (f64 precision color)
// ============================================================================

/// RGBA color with f64 components in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[cfg_attr(feature = "serde", serde(default = "opaque"))]
    pub a: f64,
}

#[cfg(feature = "serde")]
fn opaque() -> f64 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn gray(v: f64) -> Self {
        Self::new_rgb(v, v, v)
    }

    /// Fully saturated color from HSV. `h` is in degrees and wraps,
    /// `s` and `v` are in `[0, 1]`.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::new_rgb(r + m, g + m, b + m)
    }

    /// Interpolate between `self` and `c` by parameter `k` (0.0 to 1.0).
    pub fn gradient(&self, c: &Rgba, k: f64) -> Rgba {
        Rgba {
            r: lerp(self.r, c.r, k),
            g: lerp(self.g, c.g, k),
            b: lerp(self.b, c.b, k),
            a: lerp(self.a, c.a, k),
        }
    }

    /// Same color with every component clamped into `[0, 1]`.
    pub fn clamped(&self) -> Rgba {
        Rgba {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Out-of-bounds read sentinel: black with opaque alpha.
    pub const SENTINEL: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Read a pixel from a 4-byte BGRA group.
    #[inline]
    pub fn from_bgra(p: &[u8]) -> Self {
        Self {
            r: p[OrderBgra::R],
            g: p[OrderBgra::G],
            b: p[OrderBgra::B],
            a: p[OrderBgra::A],
        }
    }

    /// Write this pixel into a 4-byte BGRA group.
    #[inline]
    pub fn write_bgra(&self, p: &mut [u8]) {
        p[OrderBgra::R] = self.r;
        p[OrderBgra::G] = self.g;
        p[OrderBgra::B] = self.b;
        p[OrderBgra::A] = self.a;
    }

    /// Convert from `Rgba` (f64) to `Rgba8` (u8), clamping each component.
    pub fn from_rgba(c: &Rgba) -> Self {
        Self {
            r: unit_to_u8(c.r),
            g: unit_to_u8(c.g),
            b: unit_to_u8(c.b),
            a: unit_to_u8(c.a),
        }
    }

    /// Convert to `Rgba` (f64).
    pub fn to_rgba(&self) -> Rgba {
        Rgba {
            r: u8_to_unit(self.r),
            g: u8_to_unit(self.g),
            b: u8_to_unit(self.b),
            a: u8_to_unit(self.a),
        }
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<Rgba> for Rgba8 {
    fn from(c: Rgba) -> Self {
        Rgba8::from_rgba(&c)
    }
}

impl From<Rgba8> for Rgba {
    fn from(c: Rgba8) -> Self {
        c.to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn close(a: &Rgba, b: &Rgba) -> bool {
        (a.r - b.r).abs() < EPSILON
            && (a.g - b.g).abs() < EPSILON
            && (a.b - b.b).abs() < EPSILON
            && (a.a - b.a).abs() < EPSILON
    }

    #[test]
    fn test_hsv_primaries() {
        assert!(close(&Rgba::from_hsv(0.0, 1.0, 1.0), &Rgba::new_rgb(1.0, 0.0, 0.0)));
        assert!(close(&Rgba::from_hsv(120.0, 1.0, 1.0), &Rgba::new_rgb(0.0, 1.0, 0.0)));
        assert!(close(&Rgba::from_hsv(240.0, 1.0, 1.0), &Rgba::new_rgb(0.0, 0.0, 1.0)));
        assert!(close(&Rgba::from_hsv(60.0, 1.0, 1.0), &Rgba::new_rgb(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_hsv_wraps_degrees() {
        assert!(close(&Rgba::from_hsv(360.0, 1.0, 1.0), &Rgba::from_hsv(0.0, 1.0, 1.0)));
        assert!(close(&Rgba::from_hsv(-120.0, 1.0, 1.0), &Rgba::from_hsv(240.0, 1.0, 1.0)));
    }

    #[test]
    fn test_hsv_desaturated_is_gray() {
        assert!(close(&Rgba::from_hsv(200.0, 0.0, 0.4), &Rgba::gray(0.4)));
    }

    #[test]
    fn test_gradient() {
        let c = Rgba::BLACK.gradient(&Rgba::WHITE, 0.25);
        assert!(close(&c, &Rgba::gray(0.25)));
    }

    #[test]
    fn test_bgra_byte_order() {
        let mut bytes = [0u8; 4];
        Rgba8::new(10, 20, 30, 40).write_bgra(&mut bytes);
        assert_eq!(bytes, [30, 20, 10, 40]);
        assert_eq!(Rgba8::from_bgra(&bytes), Rgba8::new(10, 20, 30, 40));
    }

    #[test]
    fn test_rgba8_conversion_clamps() {
        let c = Rgba8::from_rgba(&Rgba::new(1.2, -0.1, 0.5, 1.0));
        assert_eq!(c, Rgba8::new(255, 0, 128, 255));
        assert!((c.to_rgba().r - 1.0).abs() < EPSILON);
    }
}
