//! Harness configuration and job files.
//!
//! Both are JSON. Every `HarnessConfig` field has a default, so an empty
//! object (or no file at all) gives a working setup:
//!
//! ```json
//! { "out_dir": "renders", "image_format": "bmp", "crf": 18 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use raster_fx::pipeline::Pipeline;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// File format of rendered frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Bmp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Bmp => "bmp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Root directory for movie acts, manifests and combined output.
    pub out_dir: PathBuf,
    pub image_format: ImageFormat,
    pub ffmpeg: String,
    /// ImageMagick `convert`, used for GIFs.
    pub convert: String,
    /// ImageMagick `montage`.
    pub montage: String,
    pub image_viewer: String,
    pub gif_viewer: String,
    pub video_player: String,
    /// x264 constant rate factor.
    pub crf: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            image_format: ImageFormat::Png,
            ffmpeg: "ffmpeg".into(),
            convert: "convert".into(),
            montage: "montage".into(),
            image_viewer: "xdg-open".into(),
            gif_viewer: "xdg-open".into(),
            video_player: "xdg-open".into(),
            crf: 20,
        }
    }
}

impl HarnessConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

/// A single `apply` job: load `input`, run `pipeline`, save `output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyJob {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub pipeline: Pipeline,
}

impl ApplyJob {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Run the job, returning the output path.
    pub fn run(&self) -> Result<&Path> {
        let mut buf = raster_fx::PixelBuffer::open(&self.input)?;
        log::info!(
            "{}: {}x{}, {} step(s)",
            self.input.display(),
            buf.width(),
            buf.height(),
            self.pipeline.len()
        );
        self.pipeline.apply(&mut buf)?;
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
            }
        }
        buf.save(&self.output)?;
        Ok(&self.output)
    }
}
