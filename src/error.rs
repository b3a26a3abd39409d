//! Error type shared by every fallible operation in the crate.
//!
//! Pixel reads and writes never fail (out-of-range coordinates resolve to a
//! sentinel or are ignored); only whole-buffer operations return errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0,
        .expected.1,
        .actual.0,
        .actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("pixel data has {actual} bytes, expected {expected}")]
    InvalidBufferLength { expected: usize, actual: usize },
    #[cfg(feature = "png")]
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
