//! Batch rendering harness for `raster-fx`.
//!
//! Renders frame functions to single images, numbered frame sequences and
//! sprite sheets, groups frames into [`program::Program`]s and
//! [`movie::Movie`]s, and hands the results to ffmpeg or ImageMagick.

pub mod config;
pub mod error;
pub mod movie;
pub mod program;
pub mod progress;
pub mod render;
pub mod sketch;
pub mod target;
pub mod tools;

pub use config::{ApplyJob, HarnessConfig, ImageFormat};
pub use error::{HarnessError, Result};
pub use movie::{Act, Movie};
pub use program::{Program, Scene};
pub use sketch::Sketch;
pub use target::Target;
pub use tools::Tools;
