//! One frame function plus the settings needed to render it to a [`Target`].

use std::path::PathBuf;

use raster_fx::{PixelBuffer, Rgba8};

use crate::error::Result;
use crate::render;
use crate::target::Target;
use crate::tools::Tools;

pub struct Sketch<F> {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pub fps: u32,
    /// Cell background for sprite sheets.
    pub background: Rgba8,
    pub target: Target,
    frame_func: F,
}

impl<F> Sketch<F>
where
    F: FnMut(&mut PixelBuffer, f64, f64, f64),
{
    pub fn new(name: impl Into<String>, width: u32, height: u32, frame_func: F) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            frame_count: 1,
            fps: 30,
            background: Rgba8::new_opaque(0, 0, 0),
            target: Target::Image,
            frame_func,
        }
    }

    pub fn frames(mut self, frame_count: usize, fps: u32) -> Self {
        self.frame_count = frame_count;
        self.fps = fps;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    /// Render to the configured target under `tools.config.out_dir`. Returns
    /// the produced file, or `None` for [`Target::None`].
    pub fn run(&mut self, tools: &Tools) -> Result<Option<PathBuf>> {
        let out_dir = &tools.config.out_dir;
        let format = tools.config.image_format;
        let frames_dir = out_dir.join(format!("{}_frames", self.name));
        let (w, h) = (self.width, self.height);
        log::info!("{}: rendering {}", self.name, self.target);

        let out = match self.target {
            Target::None => return Ok(None),
            Target::Image => {
                let path = out_dir.join(format!("{}.{}", self.name, format.extension()));
                render::image(w, h, &path, &mut self.frame_func, 0.0)?;
                path
            }
            Target::SpriteSheet => {
                let path = out_dir.join(format!("{}_sheet.{}", self.name, format.extension()));
                render::sprite_sheet(
                    w,
                    h,
                    self.background,
                    &path,
                    self.frame_count,
                    &mut self.frame_func,
                )?;
                path
            }
            Target::Gif => {
                let path = out_dir.join(format!("{}.gif", self.name));
                self.render_frames(&frames_dir, tools)?;
                tools.ffmpeg_to_gif(&frames_dir, &path, self.fps)?;
                path
            }
            Target::Video => {
                let path = out_dir.join(format!("{}.mp4", self.name));
                self.render_frames(&frames_dir, tools)?;
                tools.convert_to_video(&frames_dir, &path, w, h, self.fps)?;
                path
            }
            Target::Montage => {
                let path = out_dir.join(format!("{}_montage.png", self.name));
                self.render_frames(&frames_dir, tools)?;
                let cols = render::sheet_columns(self.frame_count);
                tools.make_montage(cols, &frames_dir, &path)?;
                path
            }
        };
        Ok(Some(out))
    }

    fn render_frames(&mut self, dir: &std::path::Path, tools: &Tools) -> Result<()> {
        render::frames(
            &self.name,
            self.width,
            self.height,
            self.frame_count,
            dir,
            tools.config.image_format,
            &mut self.frame_func,
        )
    }
}
