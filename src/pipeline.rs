//! Filter pipelines.
//!
//! [`Filter`] names every buffer-only filter in the crate together with its
//! parameters, so a chain of filters can be built in code or, with the
//! `serde` feature, read from JSON:
//!
//! ```json
//! { "steps": [
//!     { "filter": "gaussian_blur", "radius": 3 },
//!     { "filter": "dither", "kernel": "atkinson",
//!       "rect": { "x1": 0, "y1": 0, "x2": 64, "y2": 64 } }
//! ] }
//! ```
//!
//! Texture mappings are not filters: they need a second buffer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::basics::RectI;
use crate::blur;
use crate::color::Rgba;
use crate::dither::{self, DitherKernel};
use crate::error::Result;
use crate::fringe;
use crate::pixel_buffer::PixelBuffer;
use crate::process;
use crate::region;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "filter", rename_all = "snake_case"))]
pub enum Filter {
    Grayscale,
    Threshold { t: f64, color: Rgba },
    ReverseThreshold { t: f64, color: Rgba },
    Quantize { levels: u32 },
    Gamma { g: f64 },
    Invert,
    Contrast { amount: f64 },
    Brightness { amount: f64 },
    Tint { color: Rgba, t: f64 },
    Hue { hue: f64, t: f64 },
    MapGradient { from: Rgba, to: Rgba },
    MapHue { from: f64, to: f64 },
    BoxBlur { radius: i32 },
    GaussianBlur { radius: i32 },
    Sharpen,
    Dither { kernel: DitherKernel },
    ChromaticFringe { dx: i32, dy: i32 },
}

impl Filter {
    /// Every filter name, as used in JSON.
    pub const NAMES: [&'static str; 17] = [
        "grayscale",
        "threshold",
        "reverse_threshold",
        "quantize",
        "gamma",
        "invert",
        "contrast",
        "brightness",
        "tint",
        "hue",
        "map_gradient",
        "map_hue",
        "box_blur",
        "gaussian_blur",
        "sharpen",
        "dither",
        "chromatic_fringe",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Threshold { .. } => "threshold",
            Filter::ReverseThreshold { .. } => "reverse_threshold",
            Filter::Quantize { .. } => "quantize",
            Filter::Gamma { .. } => "gamma",
            Filter::Invert => "invert",
            Filter::Contrast { .. } => "contrast",
            Filter::Brightness { .. } => "brightness",
            Filter::Tint { .. } => "tint",
            Filter::Hue { .. } => "hue",
            Filter::MapGradient { .. } => "map_gradient",
            Filter::MapHue { .. } => "map_hue",
            Filter::BoxBlur { .. } => "box_blur",
            Filter::GaussianBlur { .. } => "gaussian_blur",
            Filter::Sharpen => "sharpen",
            Filter::Dither { .. } => "dither",
            Filter::ChromaticFringe { .. } => "chromatic_fringe",
        }
    }

    /// Run the filter over the whole buffer.
    pub fn apply(&self, buf: &mut PixelBuffer) {
        match *self {
            Filter::Grayscale => process::grayscale(buf),
            Filter::Threshold { t, ref color } => process::threshold(buf, t, color),
            Filter::ReverseThreshold { t, ref color } => process::reverse_threshold(buf, t, color),
            Filter::Quantize { levels } => process::quantize(buf, levels),
            Filter::Gamma { g } => process::gamma(buf, g),
            Filter::Invert => process::invert(buf),
            Filter::Contrast { amount } => process::contrast(buf, amount),
            Filter::Brightness { amount } => process::brightness(buf, amount),
            Filter::Tint { ref color, t } => process::tint(buf, color, t),
            Filter::Hue { hue, t } => process::hue(buf, hue, t),
            Filter::MapGradient { ref from, ref to } => process::map_gradient(buf, from, to),
            Filter::MapHue { from, to } => process::map_hue(buf, from, to),
            Filter::BoxBlur { radius } => blur::box_blur(buf, radius),
            Filter::GaussianBlur { radius } => blur::gaussian_blur(buf, radius),
            Filter::Sharpen => blur::sharpen(buf),
            Filter::Dither { kernel } => dither::dither(buf, kernel),
            Filter::ChromaticFringe { dx, dy } => fringe::chromatic_fringe(buf, dx, dy),
        }
    }
}

/// A filter, optionally confined to a rectangle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub filter: Filter,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rect: Option<RectI>,
}

impl Step {
    pub fn apply(&self, buf: &mut PixelBuffer) -> Result<()> {
        match self.rect {
            Some(ref rect) => region::process_rect(buf, rect, |b| self.filter.apply(b)),
            None => {
                self.filter.apply(buf);
                Ok(())
            }
        }
    }
}

impl From<Filter> for Step {
    fn from(filter: Filter) -> Self {
        Step { filter, rect: None }
    }
}

/// Filters applied in order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pipeline {
    #[cfg_attr(feature = "serde", serde(default))]
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a whole-buffer step.
    pub fn then(mut self, filter: Filter) -> Self {
        self.steps.push(filter.into());
        self
    }

    /// Append a step confined to `rect`.
    pub fn then_in(mut self, filter: Filter, rect: RectI) -> Self {
        self.steps.push(Step {
            filter,
            rect: Some(rect),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn apply(&self, buf: &mut PixelBuffer) -> Result<()> {
        for (i, step) in self.steps.iter().enumerate() {
            log::debug!(
                "pipeline step {}/{}: {}{}",
                i + 1,
                self.steps.len(),
                step.filter.name(),
                if step.rect.is_some() { " (rect)" } else { "" }
            );
            step.apply(buf)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;

    fn sample() -> PixelBuffer {
        let mut buf = PixelBuffer::new(12, 12);
        buf.process_pixels(|x, y, _| Rgba8::new_opaque((x * 20) as u8, (y * 20) as u8, 77));
        buf
    }

    #[test]
    fn test_names_match() {
        let filters = [
            Filter::Grayscale,
            Filter::Threshold {
                t: 0.5,
                color: Rgba::BLACK,
            },
            Filter::ReverseThreshold {
                t: 0.5,
                color: Rgba::BLACK,
            },
            Filter::Quantize { levels: 4 },
            Filter::Gamma { g: 2.2 },
            Filter::Invert,
            Filter::Contrast { amount: 0.3 },
            Filter::Brightness { amount: 0.1 },
            Filter::Tint {
                color: Rgba::WHITE,
                t: 0.5,
            },
            Filter::Hue { hue: 200.0, t: 0.5 },
            Filter::MapGradient {
                from: Rgba::BLACK,
                to: Rgba::WHITE,
            },
            Filter::MapHue {
                from: 0.0,
                to: 120.0,
            },
            Filter::BoxBlur { radius: 1 },
            Filter::GaussianBlur { radius: 1 },
            Filter::Sharpen,
            Filter::Dither {
                kernel: DitherKernel::Atkinson,
            },
            Filter::ChromaticFringe { dx: 1, dy: 0 },
        ];
        for (f, name) in filters.iter().zip(Filter::NAMES.iter()) {
            assert_eq!(f.name(), *name);
            // every filter runs on a real buffer
            let mut buf = sample();
            f.apply(&mut buf);
        }
    }

    #[test]
    fn test_pipeline_matches_direct_calls() {
        let pipeline = Pipeline::new()
            .then(Filter::GaussianBlur { radius: 2 })
            .then(Filter::Invert);
        let mut a = sample();
        pipeline.apply(&mut a).unwrap();

        let mut b = sample();
        blur::gaussian_blur(&mut b, 2);
        process::invert(&mut b);
        assert_eq!(a, b);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_rect_step_confined() {
        let pipeline = Pipeline::new().then_in(Filter::Invert, RectI::new(0, 0, 2, 2));
        let mut buf = sample();
        let before = buf.clone();
        pipeline.apply(&mut buf).unwrap();
        assert_eq!(buf.pixel_int(1, 1), Rgba8::new_opaque(235, 235, 178));
        assert_eq!(buf.pixel_int(5, 5), before.pixel_int(5, 5));
    }

    #[test]
    fn test_empty_pipeline() {
        let mut buf = sample();
        let before = buf.clone();
        assert!(Pipeline::new().is_empty());
        Pipeline::new().apply(&mut buf).unwrap();
        assert_eq!(buf, before);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_pipeline_from_json() {
        let json = r#"{ "steps": [
            { "filter": "gaussian_blur", "radius": 3 },
            { "filter": "threshold", "t": 0.4, "color": { "r": 1.0, "g": 0.0, "b": 0.0 } },
            { "filter": "dither", "kernel": "floyd_steinberg",
              "rect": { "x1": 0, "y1": 0, "x2": 8, "y2": 8 } }
        ] }"#;
        let pipeline: Pipeline = serde_json::from_str(json).unwrap();
        assert_eq!(pipeline.steps.len(), 3);
        assert_eq!(pipeline.steps[0].filter, Filter::GaussianBlur { radius: 3 });
        assert_eq!(
            pipeline.steps[1].filter,
            Filter::Threshold {
                t: 0.4,
                color: Rgba::new(1.0, 0.0, 0.0, 1.0)
            }
        );
        assert_eq!(pipeline.steps[2].rect, Some(RectI::new(0, 0, 8, 8)));
        assert_eq!(
            pipeline.steps[2].filter,
            Filter::Dither {
                kernel: DitherKernel::FloydSteinberg
            }
        );

        let json = serde_json::to_string(&pipeline).unwrap();
        let back: Pipeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pipeline);
    }
}
