//! Chromatic fringe: a channel-split "lens" effect.

use crate::color::Rgba8;
use crate::image_accessors::ImageAccessorClone;
use crate::pixel_buffer::PixelBuffer;

/// Shift red by `(dx, dy)` and blue by `(-dx, -dy)`.
///
/// Red at `(x, y)` is taken from `(x - dx, y - dy)` and blue from
/// `(x + dx, y + dy)`; green and alpha stay in place. Samples past an edge
/// clamp to the edge pixel. All reads come from the unmodified input.
pub fn chromatic_fringe(buf: &mut PixelBuffer, dx: i32, dy: i32) {
    if dx == 0 && dy == 0 {
        return;
    }
    log::trace!("chromatic_fringe dx={} dy={}", dx, dy);
    let w = buf.width() as i32;
    let h = buf.height() as i32;
    let mut dst = PixelBuffer::new(buf.width(), buf.height());
    let src = ImageAccessorClone::new(buf);
    for y in 0..h {
        for x in 0..w {
            let here = src.pixel(x, y);
            let r = src.pixel(x - dx, y - dy).r;
            let b = src.pixel(x + dx, y + dy).b;
            dst.set_pixel_int(x, y, Rgba8::new(r, here.g, b, here.a));
        }
    }
    *buf = dst;
}
