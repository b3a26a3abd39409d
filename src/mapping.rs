//! Geometric remapping of a texture onto the buffer.
//!
//! Both mappings are inverse: every destination pixel in a bounding box asks
//! the [`InverseMapping`] for a texel, and pixels the mapping rejects are left
//! untouched. Texels are read from the texture (never from the destination)
//! and results are staged in a copy of the destination, which replaces it in
//! one move at the end.

use crate::basics::{ifloor, map_range, wrap_tau, PI, TAU};
use crate::image_accessors::{ImageAccessorWrap, WrapModeClamp, WrapModeRepeat};
use crate::pixel_buffer::PixelBuffer;

/// Destination-to-texture coordinate mapping.
pub trait InverseMapping {
    /// Texel for the destination pixel `(x, y)`, or `None` if the pixel lies
    /// outside the mapped shape.
    fn source(&self, x: i32, y: i32) -> Option<(i32, i32)>;

    /// Destination pixels to visit, as `(x1, y1, x2, y2)` half-open.
    fn extent(&self) -> (i32, i32, i32, i32);
}

/// Run `mapping` over its extent, copying texels from `texture` into `buf`.
///
/// Texel coordinates repeat horizontally and clamp vertically, so a mapping
/// may hand back any `u`.
pub fn remap<M: InverseMapping>(buf: &mut PixelBuffer, texture: &PixelBuffer, mapping: &M) {
    let (x1, y1, x2, y2) = mapping.extent();
    let x1 = x1.max(0);
    let y1 = y1.max(0);
    let x2 = x2.min(buf.width() as i32);
    let y2 = y2.min(buf.height() as i32);

    let texels = ImageAccessorWrap::<WrapModeRepeat, WrapModeClamp>::new(texture);
    let mut staging = buf.clone();
    let mut written = 0usize;
    for y in y1..y2 {
        for x in x1..x2 {
            if let Some((u, v)) = mapping.source(x, y) {
                staging.set_pixel_int(x, y, texels.pixel(u, v));
                written += 1;
            }
        }
    }
    log::trace!("remap wrote {} pixels", written);
    *buf = staging;
}

// ============================================================================
// Sphere
// ============================================================================

/// Orthographic sphere: half of the texture's width wraps around the visible
/// hemisphere.
#[derive(Debug, Clone, Copy)]
pub struct SphereMapping {
    x: f64,
    y: f64,
    diameter: f64,
    rotation: f64,
    tex_width: i32,
    tex_height: i32,
}

impl SphereMapping {
    /// `(x, y)` is the top-left corner of the sphere's bounding square.
    /// `rotation` is normalized: 1.0 turns the texture one full revolution.
    pub fn new(texture: &PixelBuffer, x: f64, y: f64, diameter: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            diameter,
            rotation,
            tex_width: texture.width() as i32,
            tex_height: texture.height() as i32,
        }
    }
}

impl InverseMapping for SphereMapping {
    fn source(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.tex_width == 0 || self.tex_height == 0 || self.diameter <= 0.0 {
            return None;
        }
        let mut px = map_range(x as f64 - self.x, 0.0, self.diameter, -1.0, 1.0);
        let mut py = map_range(y as f64 - self.y, 0.0, self.diameter, -1.0, 1.0);
        if px * px + py * py > 1.0 {
            return None;
        }

        let width_at_height = (1.0 - py * py).sqrt();
        if width_at_height != 0.0 {
            px = (px / width_at_height).clamp(-1.0, 1.0).asin() * 2.0 / PI;
        }
        py = py.asin() * 2.0 / PI;

        let w = self.tex_width as f64;
        let u = ifloor((px + 1.0 + self.rotation * 4.0) * w / 4.0).rem_euclid(self.tex_width);
        let v = ifloor(map_range(py, -1.0, 1.0, 0.0, self.tex_height as f64))
            .clamp(0, self.tex_height - 1);
        Some((u, v))
    }

    fn extent(&self) -> (i32, i32, i32, i32) {
        (
            ifloor(self.x),
            ifloor(self.y),
            (self.x + self.diameter).ceil() as i32,
            (self.y + self.diameter).ceil() as i32,
        )
    }
}

/// Wrap `texture` around a sphere drawn into `buf`.
pub fn sphere_map(
    buf: &mut PixelBuffer,
    texture: &PixelBuffer,
    x: f64,
    y: f64,
    diameter: f64,
    rotation: f64,
) {
    log::debug!("sphere_map d={} rotation={}", diameter, rotation);
    remap(buf, texture, &SphereMapping::new(texture, x, y, diameter, rotation));
}

// ============================================================================
// Polar
// ============================================================================

/// Annulus parameters for [`polar_map`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarParams {
    pub cx: f64,
    pub cy: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Texture rows discarded at the top.
    pub crop_top: f64,
    /// Texture rows discarded at the bottom.
    pub crop_bottom: f64,
    /// Start angle in radians. At 0 the texture starts at the bottom of the
    /// ring and wraps clockwise.
    pub rotation: f64,
    /// Fold the texture so it runs out and back, closing seamlessly.
    pub mirror: bool,
}

impl PolarParams {
    pub fn new(cx: f64, cy: f64, outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            cx,
            cy,
            outer_radius,
            inner_radius,
            crop_top: 0.0,
            crop_bottom: 0.0,
            rotation: 0.0,
            mirror: false,
        }
    }
}

/// The texture's x axis runs around the ring and its y axis runs from the
/// outer edge (top row) to the inner edge (bottom row).
#[derive(Debug, Clone, Copy)]
pub struct PolarMapping {
    params: PolarParams,
    tex_width: i32,
    tex_height: i32,
}

impl PolarMapping {
    pub fn new(texture: &PixelBuffer, params: PolarParams) -> Self {
        Self {
            params,
            tex_width: texture.width() as i32,
            tex_height: texture.height() as i32,
        }
    }
}

impl InverseMapping for PolarMapping {
    fn source(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.tex_width == 0 || self.tex_height == 0 {
            return None;
        }
        let p = &self.params;
        let dx = x as f64 - p.cx;
        let dy = y as f64 - p.cy;
        let dist = dx.hypot(dy);
        if dist > p.outer_radius || dist <= p.inner_radius {
            return None;
        }

        let mut angle = wrap_tau(dy.atan2(dx) - p.rotation - PI / 2.0);
        if p.mirror {
            angle *= 2.0;
            if angle > TAU {
                angle = TAU - (angle - TAU);
            }
        }
        let u = map_range(angle, 0.0, TAU, 0.0, (self.tex_width - 1) as f64) as i32;
        let v = map_range(
            dist,
            p.inner_radius,
            p.outer_radius,
            (self.tex_height - 1) as f64 - p.crop_bottom,
            p.crop_top,
        ) as i32;
        Some((u, v))
    }

    fn extent(&self) -> (i32, i32, i32, i32) {
        let p = &self.params;
        (
            ifloor(p.cx - p.outer_radius),
            ifloor(p.cy - p.outer_radius),
            (p.cx + p.outer_radius).ceil() as i32 + 1,
            (p.cy + p.outer_radius).ceil() as i32 + 1,
        )
    }
}

/// Wrap `texture` into a ring ("donut") drawn into `buf`.
pub fn polar_map(buf: &mut PixelBuffer, texture: &PixelBuffer, params: PolarParams) {
    log::debug!(
        "polar_map outer={} inner={} mirror={}",
        params.outer_radius,
        params.inner_radius,
        params.mirror
    );
    remap(buf, texture, &PolarMapping::new(texture, params));
}

// ============================================================================
// Tests
// ============================================================================
