//! A program is a sequence of scenes rendered into one continuous frame
//! sequence, then into a video or GIF.

use std::path::Path;

use raster_fx::PixelBuffer;

use crate::config::ImageFormat;
use crate::error::{HarnessError, Result};
use crate::progress::Progress;
use crate::render::{clean_frames, frame_path, FrameFunc};
use crate::tools::Tools;

/// A run of `frame_count` frames drawn by one frame function. Percent
/// restarts at 0 for every scene.
pub struct Scene {
    pub frame_count: usize,
    frame_func: FrameFunc,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Program {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    scenes: Vec<Scene>,
}

impl Program {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            scenes: Vec::new(),
        }
    }

    pub fn add_scene_with_frames<F>(&mut self, frame_count: usize, frame_func: F) -> &mut Self
    where
        F: FnMut(&mut PixelBuffer, f64, f64, f64) + 'static,
    {
        self.scenes.push(Scene {
            frame_count,
            frame_func: Box::new(frame_func),
        });
        self
    }

    /// Adds a scene lasting `seconds` at the program's frame rate.
    pub fn add_scene_with_seconds<F>(&mut self, seconds: f64, frame_func: F) -> &mut Self
    where
        F: FnMut(&mut PixelBuffer, f64, f64, f64) + 'static,
    {
        let frames = (self.fps as f64 * seconds).max(0.0) as usize;
        self.add_scene_with_frames(frames, frame_func)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn total_frames(&self) -> usize {
        self.scenes.iter().map(|s| s.frame_count).sum()
    }

    pub fn seconds(&self) -> f64 {
        if self.fps == 0 {
            return 0.0;
        }
        self.total_frames() as f64 / self.fps as f64
    }

    /// Render every scene into a freshly cleaned `dir`. Frame numbers run on
    /// across scene boundaries.
    pub fn render(&mut self, dir: &Path, format: ImageFormat) -> Result<()> {
        let total = self.total_frames();
        if total == 0 {
            return Err(HarnessError::EmptyScene);
        }
        clean_frames(dir)?;
        let progress = Progress::start("program", total);
        let (w, h) = (self.width as f64, self.height as f64);
        let mut buf = PixelBuffer::new(self.width, self.height);
        let mut frame = 0;
        for scene in &mut self.scenes {
            for i in 0..scene.frame_count {
                let percent = i as f64 / scene.frame_count as f64;
                progress.update(frame, frame as f64 / total as f64);
                (scene.frame_func)(&mut buf, w, h, percent);
                buf.save(frame_path(dir, frame, format))?;
                frame += 1;
            }
        }
        progress.complete();
        Ok(())
    }

    pub fn render_video(&mut self, tools: &Tools, frames_dir: &Path, out: &Path) -> Result<()> {
        self.render(frames_dir, tools.config.image_format)?;
        tools.convert_to_video(frames_dir, out, self.width, self.height, self.fps)
    }

    pub fn render_gif(&mut self, tools: &Tools, frames_dir: &Path, out: &Path) -> Result<()> {
        self.render(frames_dir, tools.config.image_format)?;
        tools.ffmpeg_to_gif(frames_dir, out, self.fps)
    }
}
