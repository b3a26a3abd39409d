//! Pixel buffer: owned, row-oriented access to packed BGRA pixel data.
//!
//! A `PixelBuffer` holds exactly `width * height * 4` bytes, one BGRA group per
//! pixel, rows top-down with no padding (`stride == width * 4`). It is the
//! unit every filter in the crate reads and writes.
//!
//! Coordinate access never fails: reads outside the buffer return the opaque
//! black sentinel (`Rgba8::SENTINEL`), writes outside the buffer are ignored.
//! Only whole-buffer copies between buffers of different sizes fail, with
//! [`Error::DimensionMismatch`].

use crate::basics::RectI;
use crate::color::{OrderBgra, Rgba, Rgba8};
use crate::error::{Error, Result};

const BPP: usize = OrderBgra::N;

/// Owned BGRA32 raster.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a zero-filled (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * BPP],
            width,
            height,
        }
    }

    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let mut buf = Self::new(width, height);
        buf.fill(color);
        buf
    }

    /// Wrap existing BGRA bytes. The length must be exactly `width * height * 4`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * BPP;
        if data.len() != expected {
            return Err(Error::InvalidBufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// The whole buffer as a rectangle.
    pub fn bounds(&self) -> RectI {
        RectI::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as usize * self.width as usize + x as usize) * BPP)
        } else {
            None
        }
    }

    /// Get a safe immutable slice for row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get a safe mutable slice for row `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Pixel at (x, y) in the 0–255 domain, or the sentinel when out of bounds.
    #[inline]
    pub fn pixel_int(&self, x: i32, y: i32) -> Rgba8 {
        match self.offset(x, y) {
            Some(off) => Rgba8::from_bgra(&self.data[off..off + BPP]),
            None => Rgba8::SENTINEL,
        }
    }

    /// Pixel at (x, y) normalized to `[0, 1]`, or `(0, 0, 0, 1)` when out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        self.pixel_int(x, y).to_rgba()
    }

    /// Pixel with coordinates clamped into `bounds` first (edge replication).
    ///
    /// `bounds` is half-open, so x is clamped to `[x1, x2 - 1]`. A bounds
    /// rectangle reaching outside the buffer still yields the sentinel there.
    #[inline]
    pub fn pixel_clamped(&self, x: i32, y: i32, bounds: &RectI) -> Rgba8 {
        let cx = x.min(bounds.x2 - 1).max(bounds.x1);
        let cy = y.min(bounds.y2 - 1).max(bounds.y1);
        self.pixel_int(cx, cy)
    }

    /// Set a pixel from normalized components; ignored when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: &Rgba) {
        self.set_pixel_int(x, y, Rgba8::from_rgba(c));
    }

    /// Set a pixel from byte components; ignored when out of bounds.
    #[inline]
    pub fn set_pixel_int(&mut self, x: i32, y: i32, c: Rgba8) {
        if let Some(off) = self.offset(x, y) {
            c.write_bgra(&mut self.data[off..off + BPP]);
        }
    }

    fn check_same_size(&self, other: &PixelBuffer) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }

    /// Copy this buffer's pixels into `target`, which must be the same size.
    pub fn copy_into(&self, target: &mut PixelBuffer) -> Result<()> {
        self.check_same_size(target)?;
        target.data.copy_from_slice(&self.data);
        Ok(())
    }

    /// Copy `src`'s pixels into this buffer, which must be the same size.
    pub fn copy_from(&mut self, src: &PixelBuffer) -> Result<()> {
        src.copy_into(self)
    }

    /// Copy the pixels of `rect` from `src` into the same location here.
    ///
    /// Both buffers must be the same size; `rect` is clipped to the bounds.
    pub fn copy_rect_from(&mut self, src: &PixelBuffer, rect: &RectI) -> Result<()> {
        self.check_same_size(src)?;
        let mut r = *rect;
        if !r.clip(&self.bounds()) {
            return Ok(());
        }
        let start = r.x1 as usize * BPP;
        let end = r.x2 as usize * BPP;
        for y in r.y1 as u32..r.y2 as u32 {
            self.row_mut(y)[start..end].copy_from_slice(&src.row(y)[start..end]);
        }
        Ok(())
    }

    /// Overwrite the pixels under `src` placed with its top-left at (dx, dy).
    /// Parts of `src` falling outside this buffer are dropped.
    pub fn blit(&mut self, src: &PixelBuffer, dx: i32, dy: i32) {
        let mut r = RectI::from_xywh(dx, dy, src.width as i32, src.height as i32);
        if !r.clip(&self.bounds()) {
            return;
        }
        let len = (r.x2 - r.x1) as usize * BPP;
        let src_x = (r.x1 - dx) as usize * BPP;
        let dst_x = r.x1 as usize * BPP;
        for y in r.y1..r.y2 {
            let src_row = src.row((y - dy) as u32);
            self.row_mut(y as u32)[dst_x..dst_x + len]
                .copy_from_slice(&src_row[src_x..src_x + len]);
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba8) {
        for p in self.data.chunks_exact_mut(BPP) {
            color.write_bgra(p);
        }
    }

    /// Fill every byte in the buffer with `value`.
    pub fn clear(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Replace every pixel with the value `f(x, y, pixel)` returns, in raster order.
    pub fn process_pixels<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, Rgba8) -> Rgba8,
    {
        let w = self.width as usize;
        for (i, p) in self.data.chunks_exact_mut(BPP).enumerate() {
            let c = f((i % w) as i32, (i / w) as i32, Rgba8::from_bgra(p));
            c.write_bgra(p);
        }
    }

    /// Iterate over the 4-byte BGRA groups.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(BPP).map(Rgba8::from_bgra)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PNG / BMP I/O
// ============================================================================

#[cfg(feature = "png")]
mod io {
    use super::{PixelBuffer, BPP};
    use crate::error::{Error, Result};
    use image::{ImageFormat, RgbaImage};
    use std::path::Path;

    /// RGBA <-> BGRA: the swap is its own inverse.
    fn swap_red_blue(data: &mut [u8]) {
        for p in data.chunks_exact_mut(BPP) {
            p.swap(0, 2);
        }
    }

    impl PixelBuffer {
        /// Load any image format the `image` crate was built with.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let img = image::open(path.as_ref())?.to_rgba8();
            let (w, h) = img.dimensions();
            let mut data = img.into_raw();
            swap_red_blue(&mut data);
            log::debug!("loaded {}x{} image from {}", w, h, path.as_ref().display());
            PixelBuffer::from_vec(w, h, data)
        }

        /// Load a PNG file.
        pub fn from_png<P: AsRef<Path>>(path: P) -> Result<Self> {
            let reader = image::ImageReader::open(path.as_ref())?;
            let img = reader.with_guessed_format()?.decode()?.to_rgba8();
            let (w, h) = img.dimensions();
            let mut data = img.into_raw();
            swap_red_blue(&mut data);
            PixelBuffer::from_vec(w, h, data)
        }

        fn to_rgba_image(&self) -> Result<RgbaImage> {
            let mut data = self.data.clone();
            swap_red_blue(&mut data);
            let expected = data.len();
            RgbaImage::from_raw(self.width, self.height, data).ok_or(
                Error::InvalidBufferLength {
                    expected,
                    actual: self.data.len(),
                },
            )
        }

        /// Save as PNG regardless of the path's extension.
        pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
            self.to_rgba_image()?
                .save_with_format(path.as_ref(), ImageFormat::Png)?;
            log::debug!("saved {}x{} png to {}", self.width, self.height, path.as_ref().display());
            Ok(())
        }

        /// Save, choosing the format from the path's extension.
        pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
            self.to_rgba_image()?.save(path.as_ref())?;
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
