//! Foundation types, rounding, and range-mapping helpers.
//!
//! Everything else in the crate leans on these: the rounding and saturation
//! functions every filter uses when it writes a channel back to a byte, the
//! linear range mapping the remappers are built from, and the integer
//! rectangle that scopes filters to a region.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rounding and saturation
// ============================================================================

/// Round a double to the nearest unsigned integer (round half up).
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Floor a double toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

/// Saturate an integer channel value into `0..=255`.
#[inline]
pub fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Round and saturate a floating channel value in the 0–255 domain.
#[inline]
pub fn round_u8(v: f64) -> u8 {
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        uround(v) as u8
    }
}

/// Convert a normalized value to a byte, clamping to `[0, 1]` first.
#[inline]
pub fn unit_to_u8(v: f64) -> u8 {
    round_u8(v * 255.0)
}

/// Convert a byte to a normalized value in `[0, 1]`.
#[inline]
pub fn u8_to_unit(v: u8) -> f64 {
    v as f64 / 255.0
}

// ============================================================================
// Mathematical constants and range mapping
// ============================================================================

pub const PI: f64 = std::f64::consts::PI;
pub const TAU: f64 = std::f64::consts::TAU;

/// Linear interpolation from `a` to `b` by `t`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Map `value` linearly from `[src_min, src_max]` to `[dst_min, dst_max]`.
///
/// The destination range may be inverted (`dst_min > dst_max`); no clamping
/// is applied.
#[inline]
pub fn map_range(value: f64, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> f64 {
    dst_min + (value - src_min) / (src_max - src_min) * (dst_max - dst_min)
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn wrap_tau(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
///
/// Filters interpret it half-open: `x1..x2` by `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalize so that x1 <= x2 and y1 <= y2, swapping if needed.
    pub fn normalize(&mut self) -> &Self {
        if self.x1 > self.x2 {
            core::mem::swap(&mut self.x1, &mut self.x2);
        }
        if self.y1 > self.y2 {
            core::mem::swap(&mut self.y1, &mut self.y2);
        }
        self
    }

    /// Clip this rectangle to the intersection with `r`.
    /// Returns `true` if the result is a valid (non-empty) rectangle.
    pub fn clip(&mut self, r: &Self) -> bool {
        if self.x2 > r.x2 {
            self.x2 = r.x2;
        }
        if self.y2 > r.y2 {
            self.y2 = r.y2;
        }
        if self.x1 < r.x1 {
            self.x1 = r.x1;
        }
        if self.y1 < r.y1 {
            self.y1 = r.y1;
        }
        self.is_valid()
    }

    /// Returns `true` if the rectangle is non-empty.
    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }

    /// Returns `true` if the point (x, y) is inside the half-open rectangle.
    pub fn hit_test(&self, x: T, y: T) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;

impl RectI {
    /// Rectangle from an origin and a size.
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_ifloor() {
        assert_eq!(ifloor(1.7), 1);
        assert_eq!(ifloor(-0.2), -1);
        assert_eq!(ifloor(-2.0), -2);
    }

    #[test]
    fn test_round_u8_saturates() {
        assert_eq!(round_u8(-3.0), 0);
        assert_eq!(round_u8(254.6), 255);
        assert_eq!(round_u8(300.0), 255);
        assert_eq!(round_u8(127.4), 127);
        assert_eq!(clamp_u8(-1), 0);
        assert_eq!(clamp_u8(256), 255);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(1.5), 255);
        assert_eq!(unit_to_u8(0.5), 128);
        assert!((u8_to_unit(255) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_map_range() {
        assert!((map_range(0.5, 0.0, 1.0, -1.0, 1.0)).abs() < EPSILON);
        assert!((map_range(25.0, 0.0, 100.0, 10.0, 0.0) - 7.5).abs() < EPSILON);
        assert!((map_range(2.0, 0.0, 1.0, 0.0, 10.0) - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_wrap_tau() {
        assert!((wrap_tau(-PI / 2.0) - 1.5 * PI).abs() < EPSILON);
        assert!((wrap_tau(TAU + 1.0) - 1.0).abs() < EPSILON);
        assert!(wrap_tau(TAU) < EPSILON);
    }

    #[test]
    fn test_rect_clip() {
        let mut r = RectI::new(-5, 2, 20, 30);
        assert!(r.clip(&RectI::new(0, 0, 10, 10)));
        assert_eq!(r, RectI::new(0, 2, 10, 10));
        let mut outside = RectI::new(20, 20, 30, 30);
        assert!(!outside.clip(&RectI::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_rect_normalize_and_size() {
        let mut r = RectI::new(10, 8, 2, 1);
        r.normalize();
        assert_eq!(r, RectI::new(2, 1, 10, 8));
        assert_eq!(r.width(), 8);
        assert_eq!(r.height(), 7);
        assert!(r.hit_test(2, 1));
        assert!(!r.hit_test(10, 1));
        assert_eq!(RectI::from_xywh(1, 2, 3, 4), RectI::new(1, 2, 4, 6));
    }
}
