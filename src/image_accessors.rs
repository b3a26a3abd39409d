//! Pixel access with boundary handling modes.
//!
//! Filters that read neighbors or sample textures go through one of these
//! accessors instead of indexing the buffer directly:
//!
//! - [`ImageAccessorClone`]: out-of-bounds reads snap to the nearest edge
//!   pixel of a bounds rectangle (edge replication).
//! - [`ImageAccessorWrap`]: each axis is mapped through a [`WrapMode`].
//!
//! The clone accessor follows a span protocol: `span(x, y, len)`
//! returns the first pixel of a run, then `next_x()` / `next_y()` step along
//! it, taking a fast in-bounds path when the whole run fits.

use crate::basics::RectI;
use crate::color::Rgba8;
use crate::pixel_buffer::PixelBuffer;

// ============================================================================
// WrapMode trait
// ============================================================================

/// Coordinate wrapping mode for one image axis.
pub trait WrapMode {
    /// Create a wrap mode for the given image dimension.
    fn new(size: u32) -> Self;

    /// Map a coordinate to a valid index.
    fn func(&self, v: i32) -> u32;
}

// ============================================================================
// WrapModeRepeat: modulo wrapping
// ============================================================================

/// Repeat (modulo) wrapping for tiling. Negative coordinates wrap from the end.
pub struct WrapModeRepeat {
    size: u32,
}

impl WrapMode for WrapModeRepeat {
    fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    #[inline]
    fn func(&self, v: i32) -> u32 {
        (v as i64).rem_euclid(self.size as i64) as u32
    }
}

// ============================================================================
// WrapModeClamp: edge replication
// ============================================================================

/// Clamp to `[0, size - 1]`.
pub struct WrapModeClamp {
    max: u32,
}

impl WrapMode for WrapModeClamp {
    fn new(size: u32) -> Self {
        Self {
            max: size.saturating_sub(1),
        }
    }

    #[inline]
    fn func(&self, v: i32) -> u32 {
        (v.max(0) as u32).min(self.max)
    }
}

// ============================================================================
// ImageAccessorClone: clamp to edge pixels
// ============================================================================

/// Image accessor with clamping: out-of-bounds coordinates snap to edge pixels
/// of `bounds` (the whole buffer unless narrowed with [`with_bounds`]).
///
/// [`with_bounds`]: ImageAccessorClone::with_bounds
pub struct ImageAccessorClone<'a> {
    buf: &'a PixelBuffer,
    bounds: RectI,
    x: i32,
    x0: i32,
    y: i32,
    fast_path: bool,
    pix_off: usize,
}

impl<'a> ImageAccessorClone<'a> {
    pub fn new(buf: &'a PixelBuffer) -> Self {
        Self::with_bounds(buf, buf.bounds())
    }

    /// Clamp to `bounds` instead of the full buffer. `bounds` is clipped to
    /// the buffer so every read lands on a real pixel.
    pub fn with_bounds(buf: &'a PixelBuffer, bounds: RectI) -> Self {
        let mut b = bounds;
        if !b.clip(&buf.bounds()) {
            b = buf.bounds();
        }
        Self {
            buf,
            bounds: b,
            x: 0,
            x0: 0,
            y: 0,
            fast_path: false,
            pix_off: 0,
        }
    }

    /// Random access read with edge clamping.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        self.buf.pixel_clamped(x, y, &self.bounds)
    }

    #[inline]
    fn fast_pixel(&self) -> Rgba8 {
        let row = self.buf.row(self.y as u32);
        Rgba8::from_bgra(&row[self.pix_off..self.pix_off + 4])
    }

    pub fn span(&mut self, x: i32, y: i32, len: u32) -> Rgba8 {
        self.x = x;
        self.x0 = x;
        self.y = y;
        let b = &self.bounds;
        if y >= b.y1 && y < b.y2 && x >= b.x1 && x + len as i32 <= b.x2 {
            self.fast_path = true;
            self.pix_off = x as usize * 4;
            self.fast_pixel()
        } else {
            self.fast_path = false;
            self.pixel(self.x, self.y)
        }
    }

    pub fn next_x(&mut self) -> Rgba8 {
        self.x += 1;
        if self.fast_path {
            self.pix_off += 4;
            self.fast_pixel()
        } else {
            self.pixel(self.x, self.y)
        }
    }

    pub fn next_y(&mut self) -> Rgba8 {
        self.y += 1;
        self.x = self.x0;
        if self.fast_path && self.y < self.bounds.y2 {
            self.pix_off = self.x as usize * 4;
            self.fast_pixel()
        } else {
            self.fast_path = false;
            self.pixel(self.x, self.y)
        }
    }
}

// ============================================================================
// ImageAccessorWrap: per-axis wrap modes
// ============================================================================

/// Image accessor mapping each axis through a [`WrapMode`].
pub struct ImageAccessorWrap<'a, WX: WrapMode, WY: WrapMode> {
    buf: &'a PixelBuffer,
    wrap_x: WX,
    wrap_y: WY,
}

impl<'a, WX: WrapMode, WY: WrapMode> ImageAccessorWrap<'a, WX, WY> {
    pub fn new(buf: &'a PixelBuffer) -> Self {
        Self {
            buf,
            wrap_x: WX::new(buf.width()),
            wrap_y: WY::new(buf.height()),
        }
    }

    /// Read the pixel at the wrapped coordinates. An empty buffer yields the
    /// out-of-bounds sentinel.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        let wx = self.wrap_x.func(x);
        let wy = self.wrap_y.func(y);
        self.buf.pixel_int(wx as i32, wy as i32)
    }
}

// ============================================================================
// Tests
// ============================================================================
