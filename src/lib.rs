//! # raster-fx
//!
//! Pixel-processing filters that work directly on a packed BGRA framebuffer.
//!
//! Everything operates on a [`PixelBuffer`]: `width * height * 4` bytes, one
//! blue-green-red-alpha group per pixel, rows top-down. Filters mutate the
//! buffer in place and never fail on pixel coordinates; out-of-range reads
//! return opaque black and out-of-range writes are dropped.
//!
//! - Point-wise color transforms: grayscale, threshold, invert, gamma,
//!   contrast, brightness, tint, hue, quantize, gradient mapping
//! - Separable box and Gaussian blur, 3×3 sharpen
//! - Error-diffusion dithering with five kernels
//! - Sphere and polar ("donut") texture remapping
//! - Chromatic fringe channel splitting
//! - Rectangle-scoped filtering and JSON-describable filter pipelines
//!
//! ## Example
//!
//! ```
//! use raster_fx::{blur, dither, PixelBuffer, Rgba8};
//! use raster_fx::dither::DitherKernel;
//!
//! let mut buf = PixelBuffer::filled(64, 64, Rgba8::new_opaque(90, 140, 200));
//! blur::gaussian_blur(&mut buf, 3);
//! dither::dither(&mut buf, DitherKernel::Atkinson);
//! assert!(buf.pixels().all(|p| p.r == 0 || p.r == 255));
//! ```

// Foundation
pub mod basics;
pub mod color;
pub mod error;
pub mod pixel_buffer;
pub mod image_accessors;

// Point-wise transforms
pub mod curves;
pub mod process;

// Neighborhood filters
pub mod blur;
pub mod dither;
pub mod fringe;

// Remapping
pub mod mapping;

// Composition
pub mod palette;
pub mod pipeline;
pub mod region;

pub use basics::RectI;
pub use color::{Rgba, Rgba8};
pub use error::{Error, Result};
pub use pixel_buffer::PixelBuffer;
