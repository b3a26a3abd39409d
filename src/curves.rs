//! Per-channel tone curves and lookup tables.
//!
//! A [`ChannelCurve`] maps one channel value in the 0–255 domain to a new
//! value. Point-wise filters whose output for a channel depends only on that
//! channel (gamma, contrast, brightness, invert, quantize) are all curves,
//! baked into a 256-entry [`CurveLut`] before touching the buffer so each
//! byte costs one table lookup.

use crate::basics::round_u8;
use crate::color::OrderBgra;
use crate::pixel_buffer::PixelBuffer;

// ============================================================================
// Curve trait
// ============================================================================

/// A channel transfer function over the 0–255 domain.
///
/// Results outside `[0, 255]` are clamped when baked into a [`CurveLut`].
pub trait ChannelCurve {
    fn call(&self, v: f64) -> f64;
}

// ============================================================================
// Gamma
// ============================================================================

/// `255 * (v / 255)^(1 / gamma)`. A gamma of zero or below is the identity.
#[derive(Debug, Clone, Copy)]
pub struct CurveGamma {
    gamma: f64,
}

impl CurveGamma {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for CurveGamma {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

impl ChannelCurve for CurveGamma {
    #[inline]
    fn call(&self, v: f64) -> f64 {
        if self.gamma <= 0.0 {
            return v;
        }
        255.0 * (v / 255.0).powf(1.0 / self.gamma)
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Contrast correction around mid-gray:
/// `f = 259 (c + 255) / (255 (259 - c))`, `c = 255 * amount`,
/// `out = f (v - 128) + 128`.
///
/// `c` is held below 259 where the factor diverges.
#[derive(Debug, Clone, Copy)]
pub struct CurveContrast {
    factor: f64,
}

impl CurveContrast {
    pub fn new(amount: f64) -> Self {
        let c = (255.0 * amount).clamp(-255.0, 258.0);
        Self {
            factor: 259.0 * (c + 255.0) / (255.0 * (259.0 - c)),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl ChannelCurve for CurveContrast {
    #[inline]
    fn call(&self, v: f64) -> f64 {
        self.factor * (v - 128.0) + 128.0
    }
}

// ============================================================================
// Brightness
// ============================================================================

/// `v + 255 * amount`.
#[derive(Debug, Clone, Copy)]
pub struct CurveBrightness {
    offset: f64,
}

impl CurveBrightness {
    pub fn new(amount: f64) -> Self {
        Self {
            offset: 255.0 * amount,
        }
    }
}

impl ChannelCurve for CurveBrightness {
    #[inline]
    fn call(&self, v: f64) -> f64 {
        v + self.offset
    }
}

// ============================================================================
// Invert
// ============================================================================

/// `255 - v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveInvert;

impl ChannelCurve for CurveInvert {
    #[inline]
    fn call(&self, v: f64) -> f64 {
        255.0 - v
    }
}

// ============================================================================
// Quantize
// ============================================================================

/// Snap to the nearest of `levels` evenly spaced values across `[0, 255]`.
/// Fewer than two levels is the identity.
#[derive(Debug, Clone, Copy)]
pub struct CurveQuantize {
    levels: u32,
}

impl CurveQuantize {
    pub fn new(levels: u32) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }
}

impl ChannelCurve for CurveQuantize {
    #[inline]
    fn call(&self, v: f64) -> f64 {
        if self.levels < 2 {
            return v;
        }
        let step = 255.0 / (self.levels - 1) as f64;
        (v / step).round() * step
    }
}

// ============================================================================
// Curve LUT
// ============================================================================

/// A curve baked into a 256-entry byte table.
#[derive(Clone)]
pub struct CurveLut {
    table: [u8; 256],
}

impl CurveLut {
    /// Identity table.
    pub fn new() -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        Self { table }
    }

    /// Bake `curve`, rounding and clamping each output to a byte.
    pub fn from_curve<C: ChannelCurve + ?Sized>(curve: &C) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = round_u8(curve.call(i as f64));
        }
        Self { table }
    }

    #[inline]
    pub fn map(&self, v: u8) -> u8 {
        self.table[v as usize]
    }

    /// Map the R, G and B bytes of every pixel; alpha is untouched.
    pub fn apply_rgb(&self, buf: &mut PixelBuffer) {
        for p in buf.data_mut().chunks_exact_mut(OrderBgra::N) {
            p[OrderBgra::R] = self.table[p[OrderBgra::R] as usize];
            p[OrderBgra::G] = self.table[p[OrderBgra::G] as usize];
            p[OrderBgra::B] = self.table[p[OrderBgra::B] as usize];
        }
    }
}

impl Default for CurveLut {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
