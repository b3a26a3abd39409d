//! A movie is a set of named acts. Each act renders to its own frame
//! directory and video under the output directory; the act videos are then
//! joined with the ffmpeg concat demuxer.
//!
//! For a movie `demo` with an act `intro` and `out_dir = "out"`:
//!
//! ```text
//! out/intro_frames/frame_0000.png ...
//! out/intro.mp4
//! out/intro.png        (single-frame preview)
//! out/demo.manifest
//! out/demo.mp4
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use raster_fx::PixelBuffer;

use crate::error::{HarnessError, Result};
use crate::render::{self, FrameFunc};
use crate::tools::Tools;

pub struct Act {
    pub name: String,
    pub frame_count: usize,
    /// Included by [`Movie::render_all`].
    pub render: bool,
    frame_func: FrameFunc,
}

impl std::fmt::Debug for Act {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Act")
            .field("name", &self.name)
            .field("frame_count", &self.frame_count)
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Movie {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub tools: Tools,
    acts: Vec<Act>,
    index: HashMap<String, usize>,
}

impl Movie {
    pub fn new(name: impl Into<String>, width: u32, height: u32, fps: u32, tools: Tools) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            fps,
            tools,
            acts: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn out_dir(&self) -> &Path {
        &self.tools.config.out_dir
    }

    /// Adds an act, or replaces the act of the same name in place.
    pub fn new_act<F>(&mut self, name: &str, frame_count: usize, frame_func: F, render: bool)
    where
        F: FnMut(&mut PixelBuffer, f64, f64, f64) + 'static,
    {
        let act = Act {
            name: name.to_string(),
            frame_count,
            render,
            frame_func: Box::new(frame_func),
        };
        match self.index.get(name) {
            Some(&i) => self.acts[i] = act,
            None => {
                self.index.insert(name.to_string(), self.acts.len());
                self.acts.push(act);
            }
        }
    }

    /// Acts in insertion order.
    pub fn acts(&self) -> &[Act] {
        &self.acts
    }

    pub fn frames_dir(&self, act: &str) -> PathBuf {
        self.out_dir().join(format!("{}_frames", act))
    }

    pub fn video_path(&self, act: &str) -> PathBuf {
        self.out_dir().join(format!("{}.mp4", act))
    }

    pub fn preview_path(&self, act: &str) -> PathBuf {
        self.out_dir().join(format!("{}.png", act))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir().join(format!("{}.manifest", self.name))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.out_dir().join(format!("{}.mp4", self.name))
    }

    fn act_index(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::UnknownAct(name.to_string()))
    }

    /// Render the act's frames only.
    pub fn render_act_frames(&mut self, name: &str) -> Result<()> {
        let i = self.act_index(name)?;
        let dir = self.frames_dir(name);
        let format = self.tools.config.image_format;
        let (w, h) = (self.width, self.height);
        let act = &mut self.acts[i];
        if act.frame_count == 0 {
            return Err(HarnessError::EmptyScene);
        }
        render::frames(name, w, h, act.frame_count, &dir, format, &mut act.frame_func)
    }

    /// Render the act's frames and encode them as `<out>/<name>.mp4`.
    pub fn render_act(&mut self, name: &str) -> Result<()> {
        self.render_act_frames(name)?;
        self.tools.convert_to_video(
            &self.frames_dir(name),
            &self.video_path(name),
            self.width,
            self.height,
            self.fps,
        )
    }

    /// Render every act flagged for rendering, in insertion order.
    pub fn render_all(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .acts
            .iter()
            .filter(|a| a.render)
            .map(|a| a.name.clone())
            .collect();
        for name in names {
            self.render_act(&name)?;
        }
        Ok(())
    }

    /// Render a single frame of an act to `<out>/<name>.png`.
    pub fn render_act_frame(&mut self, name: &str, frame: usize) -> Result<PathBuf> {
        let i = self.act_index(name)?;
        let path = self.preview_path(name);
        let (w, h) = (self.width, self.height);
        let act = &mut self.acts[i];
        let percent = if act.frame_count == 0 {
            0.0
        } else {
            frame as f64 / act.frame_count as f64
        };
        render::image(w, h, &path, &mut act.frame_func, percent)?;
        Ok(path)
    }

    pub fn play_act(&self, name: &str) -> Result<()> {
        self.act_index(name)?;
        self.tools.play_video(&self.video_path(name))
    }

    /// Play each act video in turn.
    pub fn play_all(&self) -> Result<()> {
        for act in &self.acts {
            self.tools.play_video(&self.video_path(&act.name))?;
        }
        Ok(())
    }

    /// Manifest text for the concat demuxer, one `file <name>.mp4` per act.
    pub fn manifest(&self) -> String {
        self.acts
            .iter()
            .map(|a| format!("file {}.mp4\n", a.name))
            .collect()
    }

    /// Write the manifest and return the names of acts whose video does not
    /// exist yet.
    pub fn write_manifest(&self) -> Result<Vec<String>> {
        let out = self.out_dir();
        fs::create_dir_all(out).map_err(|e| HarnessError::io(out, e))?;
        let mut missing = Vec::new();
        for act in &self.acts {
            let video = self.video_path(&act.name);
            if !video.exists() {
                log::warn!("act video missing: {}", video.display());
                missing.push(act.name.clone());
            }
        }
        let path = self.manifest_path();
        fs::write(&path, self.manifest()).map_err(|e| HarnessError::io(&path, e))?;
        log::debug!("wrote manifest {}", path.display());
        Ok(missing)
    }

    /// Join every act video into `<out>/<movie>.mp4`.
    pub fn combine_all(&self) -> Result<PathBuf> {
        self.write_manifest()?;
        let out = self.combined_path();
        self.tools.concat(&self.manifest_path(), &out)?;
        log::info!("movie complete: {}", out.display());
        Ok(out)
    }

    pub fn play_combined(&self) -> Result<()> {
        self.tools.play_video(&self.combined_path())
    }

    /// Remove every act's frame directory.
    pub fn clean(&self) -> Result<()> {
        for act in &self.acts {
            let dir = self.frames_dir(&act.name);
            match fs::remove_dir_all(&dir) {
                Ok(()) => log::debug!("removed {}", dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(HarnessError::io(dir, e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use raster_fx::{Rgba, Rgba8};

    fn movie_in(dir: &Path) -> Movie {
        let config = HarnessConfig {
            out_dir: dir.to_path_buf(),
            ..HarnessConfig::default()
        };
        Movie::new("demo", 4, 4, 10, Tools::new(config))
    }

    fn shade(buf: &mut PixelBuffer, _w: f64, _h: f64, p: f64) {
        buf.fill(Rgba8::from_rgba(&Rgba::gray(p)));
    }

    #[test]
    fn test_paths() {
        let movie = movie_in(Path::new("out"));
        assert_eq!(movie.frames_dir("intro"), PathBuf::from("out/intro_frames"));
        assert_eq!(movie.video_path("intro"), PathBuf::from("out/intro.mp4"));
        assert_eq!(movie.preview_path("intro"), PathBuf::from("out/intro.png"));
        assert_eq!(movie.manifest_path(), PathBuf::from("out/demo.manifest"));
        assert_eq!(movie.combined_path(), PathBuf::from("out/demo.mp4"));
    }

    #[test]
    fn test_acts_keep_insertion_order_and_replace() {
        let mut movie = movie_in(Path::new("out"));
        movie.new_act("b", 3, shade, true);
        movie.new_act("a", 5, shade, false);
        movie.new_act("b", 7, shade, true);
        let names: Vec<_> = movie.acts().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(movie.acts()[0].frame_count, 7);
        assert_eq!(movie.manifest(), "file b.mp4\nfile a.mp4\n");
    }

    #[test]
    fn test_unknown_act() {
        let mut movie = movie_in(Path::new("out"));
        let err = movie.render_act_frame("nope", 0).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownAct(ref n) if n == "nope"));
        assert!(movie.play_act("nope").is_err());
    }

    #[test]
    fn test_render_act_frame_preview() {
        let dir = tempfile::tempdir().unwrap();
        let mut movie = movie_in(dir.path());
        movie.new_act("intro", 4, shade, true);
        let path = movie.render_act_frame("intro", 2).unwrap();
        assert_eq!(path, dir.path().join("intro.png"));
        let buf = PixelBuffer::from_png(&path).unwrap();
        assert_eq!(buf.pixel_int(0, 0), Rgba8::new_opaque(128, 128, 128));
    }

    #[test]
    fn test_render_frames_and_clean() {
        let dir = tempfile::tempdir().unwrap();
        let mut movie = movie_in(dir.path());
        movie.new_act("intro", 3, shade, true);
        movie.render_act_frames("intro").unwrap();
        let frames = movie.frames_dir("intro");
        assert!(frames.join("frame_0002.png").exists());
        movie.clean().unwrap();
        assert!(!frames.exists());
        movie.clean().unwrap();
    }

    #[test]
    fn test_write_manifest_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut movie = movie_in(dir.path());
        movie.new_act("intro", 3, shade, true);
        movie.new_act("outro", 3, shade, true);
        fs::write(movie.video_path("intro"), b"").unwrap();

        let missing = movie.write_manifest().unwrap();
        assert_eq!(missing, ["outro"]);
        let text = fs::read_to_string(movie.manifest_path()).unwrap();
        assert_eq!(text, "file intro.mp4\nfile outro.mp4\n");
    }
}
