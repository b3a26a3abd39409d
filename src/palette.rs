//! Color palettes sampled from images.

use rand::seq::SliceRandom;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::pixel_buffer::PixelBuffer;

/// An ordered list of colors.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn push(&mut self, color: Rgba) {
        self.colors.push(color);
    }

    pub fn get(&self, index: usize) -> Option<&Rgba> {
        self.colors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgba> {
        self.colors.iter()
    }

    /// A uniformly chosen color, or `None` for an empty palette.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Rgba> {
        self.colors.choose(rng)
    }
}

impl FromIterator<Rgba> for Palette {
    fn from_iter<I: IntoIterator<Item = Rgba>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// Sample `count` pixels at random positions of `buf` into an opaque palette.
/// An empty buffer yields an empty palette.
pub fn sample_colors<R: Rng + ?Sized>(buf: &PixelBuffer, count: usize, rng: &mut R) -> Palette {
    if buf.width() == 0 || buf.height() == 0 {
        return Palette::new();
    }
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..buf.width()) as i32;
            let y = rng.gen_range(0..buf.height()) as i32;
            let c = buf.pixel(x, y);
            Rgba::new_rgb(c.r, c.g, c.b)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_count_and_membership() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set_pixel_int(0, 0, Rgba8::new(255, 0, 0, 10));
        buf.set_pixel_int(1, 0, Rgba8::new(0, 0, 255, 10));
        let mut rng = StdRng::seed_from_u64(7);
        let palette = sample_colors(&buf, 25, &mut rng);
        assert_eq!(palette.len(), 25);
        for c in palette.iter() {
            assert_eq!(c.a, 1.0);
            assert!(*c == Rgba::new_rgb(1.0, 0.0, 0.0) || *c == Rgba::new_rgb(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_sampling_is_deterministic_per_seed() {
        let mut buf = PixelBuffer::new(16, 16);
        buf.process_pixels(|x, y, _| Rgba8::new_opaque((x * 16) as u8, (y * 16) as u8, 0));
        let a = sample_colors(&buf, 10, &mut StdRng::seed_from_u64(42));
        let b = sample_colors(&buf, 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_buffer() {
        let buf = PixelBuffer::new(0, 0);
        let palette = sample_colors(&buf, 5, &mut StdRng::seed_from_u64(1));
        assert!(palette.is_empty());
        assert!(palette.random(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_push_get_random() {
        let mut palette = Palette::new();
        palette.push(Rgba::WHITE);
        palette.push(Rgba::BLACK);
        assert_eq!(palette.get(1), Some(&Rgba::BLACK));
        assert_eq!(palette.get(2), None);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            let c = palette.random(&mut rng).unwrap();
            assert!(*c == Rgba::WHITE || *c == Rgba::BLACK);
        }
    }
}
