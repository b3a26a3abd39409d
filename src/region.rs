//! Running a filter on a rectangle of the buffer.
//!
//! The rectangle's pixels are copied into an isolated buffer of the same size
//! whose other pixels are transparent black. The filter runs on that whole
//! buffer, then only the rectangle is copied back. Neighborhood filters near
//! the rectangle's border therefore see transparent black, not the pixels
//! around the rectangle.

use crate::basics::RectI;
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;

/// Apply `f` to `rect` of `buf` in isolation.
///
/// Fails with `DimensionMismatch` if `f` resizes the isolated buffer.
pub fn process_rect<F>(buf: &mut PixelBuffer, rect: &RectI, f: F) -> Result<()>
where
    F: FnOnce(&mut PixelBuffer),
{
    let mut r = *rect;
    r.normalize();
    if !r.clip(&buf.bounds()) {
        log::trace!("process_rect: {:?} outside buffer, skipped", rect);
        return Ok(());
    }
    let mut isolated = PixelBuffer::new(buf.width(), buf.height());
    isolated.copy_rect_from(buf, &r)?;
    f(&mut isolated);
    buf.copy_rect_from(&isolated, &r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blur::gaussian_blur;
    use crate::color::Rgba8;
    use crate::error::Error;
    use crate::process::invert;

    #[test]
    fn test_only_rect_changes() {
        let mut buf = PixelBuffer::filled(8, 8, Rgba8::new_opaque(10, 20, 30));
        process_rect(&mut buf, &RectI::new(2, 2, 5, 4), invert).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..5).contains(&x) && (2..4).contains(&y);
                let expected = if inside {
                    Rgba8::new_opaque(245, 235, 225)
                } else {
                    Rgba8::new_opaque(10, 20, 30)
                };
                assert_eq!(buf.pixel_int(x, y), expected, "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn test_rect_is_isolated_from_surroundings() {
        let mut buf = PixelBuffer::filled(10, 10, Rgba8::new_opaque(255, 255, 255));
        process_rect(&mut buf, &RectI::new(3, 3, 7, 7), |b| gaussian_blur(b, 2)).unwrap();
        // the rect border mixes with transparent black
        assert!(buf.pixel_int(3, 3).a < 255);
        assert_eq!(buf.pixel_int(2, 2), Rgba8::new_opaque(255, 255, 255));
    }

    #[test]
    fn test_rect_clipped_and_outside() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba8::new_opaque(0, 0, 0));
        process_rect(&mut buf, &RectI::new(2, 2, 100, 100), invert).unwrap();
        assert_eq!(buf.pixel_int(3, 3), Rgba8::new_opaque(255, 255, 255));
        assert_eq!(buf.pixel_int(1, 1), Rgba8::new_opaque(0, 0, 0));

        let before = buf.clone();
        process_rect(&mut buf, &RectI::new(10, 10, 20, 20), invert).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn test_resizing_filter_fails() {
        let mut buf = PixelBuffer::new(4, 4);
        let err = process_rect(&mut buf, &RectI::new(0, 0, 2, 2), |b| {
            *b = PixelBuffer::new(1, 1)
        })
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }
}
