//! External programs: ffmpeg, ImageMagick and viewers.
//!
//! Every command is built by a `*_command` function first so the exact
//! argument list can be inspected, then run through [`Tools::run`], which
//! turns a non-zero exit into [`HarnessError::Command`].

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{HarnessConfig, ImageFormat};
use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, Default)]
pub struct Tools {
    pub config: HarnessConfig,
}

impl Tools {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    fn frame_pattern(&self, frames_dir: &Path) -> PathBuf {
        frame_pattern(frames_dir, self.config.image_format)
    }

    // ========================================================================
    // Command builders
    // ========================================================================

    pub fn video_command(
        &self,
        frames_dir: &Path,
        out: &Path,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.arg("-framerate")
            .arg(fps.to_string())
            .arg("-i")
            .arg(self.frame_pattern(frames_dir))
            .arg("-s:v")
            .arg(format!("{}x{}", width, height))
            .args(["-c:v", "libx264", "-profile:v", "high", "-crf"])
            .arg(self.config.crf.to_string())
            .args(["-pix_fmt", "yuv420p"])
            .arg(out);
        cmd
    }

    pub fn palettegen_command(&self, frames_dir: &Path, palette: &Path) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.arg("-y")
            .arg("-i")
            .arg(self.frame_pattern(frames_dir))
            .args(["-vf", "palettegen"])
            .arg(palette);
        cmd
    }

    pub fn paletteuse_command(
        &self,
        frames_dir: &Path,
        palette: &Path,
        out: &Path,
        fps: u32,
    ) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.arg("-y")
            .arg("-framerate")
            .arg(fps.to_string())
            .arg("-i")
            .arg(self.frame_pattern(frames_dir))
            .arg("-i")
            .arg(palette)
            .args(["-filter_complex", "paletteuse"])
            .arg(out);
        cmd
    }

    /// ImageMagick GIF from every frame in `frames_dir`. The delay is in
    /// hundredths of a second.
    pub fn convert_gif_command(&self, frames_dir: &Path, out: &Path, fps: u32) -> Command {
        let mut cmd = Command::new(&self.config.convert);
        cmd.arg("-delay")
            .arg(gif_delay(fps).to_string())
            .args(["-layers", "Optimize"])
            .args(frame_files(frames_dir, self.config.image_format))
            .arg(out);
        cmd
    }

    pub fn montage_command(&self, columns: u32, frames_dir: &Path, out: &Path) -> Command {
        let mut cmd = Command::new(&self.config.montage);
        cmd.args(frame_files(frames_dir, self.config.image_format))
            .arg("-tile")
            .arg(columns.to_string())
            .args(["-geometry", "+1+1"])
            .arg(out);
        cmd
    }

    pub fn mix_av_command(&self, video: &Path, audio: &Path, out: &Path) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-c", "copy", "-map", "0:v:0", "-map", "1:a:0"])
            .arg(out);
        cmd
    }

    pub fn concat_command(&self, manifest: &Path, out: &Path) -> Command {
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.args(["-y", "-f", "concat", "-i"])
            .arg(manifest)
            .args(["-c", "copy"])
            .arg(out);
        cmd
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Encode `frames_dir/frame_%04d.<ext>` as an H.264 video. An existing
    /// `out` is replaced.
    pub fn convert_to_video(
        &self,
        frames_dir: &Path,
        out: &Path,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Result<()> {
        remove_if_exists(out)?;
        log::info!("converting {} to video...", frames_dir.display());
        self.run(&mut self.video_command(frames_dir, out, width, height, fps))?;
        log::info!("video complete: {}", out.display());
        Ok(())
    }

    /// Two-pass ffmpeg GIF. The palette image is written next to `out` and
    /// removed afterwards, whether or not encoding succeeded.
    pub fn ffmpeg_to_gif(&self, frames_dir: &Path, out: &Path, fps: u32) -> Result<()> {
        let palette = out.with_extension("palette.png");
        log::info!("converting {} to gif...", frames_dir.display());
        let encoded = self
            .run(&mut self.palettegen_command(frames_dir, &palette))
            .and_then(|()| {
                self.run(&mut self.paletteuse_command(frames_dir, &palette, out, fps))
            });
        match encoded {
            Ok(()) => remove_if_exists(&palette)?,
            Err(e) => {
                if let Err(cleanup) = remove_if_exists(&palette) {
                    log::warn!("{}", cleanup);
                }
                return Err(e);
            }
        }
        log::info!("gif complete: {}", out.display());
        Ok(())
    }

    pub fn convert_to_gif(&self, frames_dir: &Path, out: &Path, fps: u32) -> Result<()> {
        log::info!("converting {} to gif with ImageMagick...", frames_dir.display());
        self.run(&mut self.convert_gif_command(frames_dir, out, fps))?;
        log::info!("gif complete: {}", out.display());
        Ok(())
    }

    pub fn make_montage(&self, columns: u32, frames_dir: &Path, out: &Path) -> Result<()> {
        log::info!("making montage of {}...", frames_dir.display());
        self.run(&mut self.montage_command(columns, frames_dir, out))?;
        log::info!("montage complete: {}", out.display());
        Ok(())
    }

    /// Mux the video stream of `video` with the audio stream of `audio`.
    pub fn mix_av(&self, video: &Path, audio: &Path, out: &Path) -> Result<()> {
        self.run(&mut self.mix_av_command(video, audio, out))
    }

    pub fn concat(&self, manifest: &Path, out: &Path) -> Result<()> {
        self.run(&mut self.concat_command(manifest, out))
    }

    pub fn view_image(&self, path: &Path) -> Result<()> {
        self.run(Command::new(&self.config.image_viewer).arg(path))
    }

    pub fn view_gif(&self, path: &Path) -> Result<()> {
        self.run(Command::new(&self.config.gif_viewer).arg(path))
    }

    pub fn play_video(&self, path: &Path) -> Result<()> {
        self.run(Command::new(&self.config.video_player).arg(path))
    }

    /// Run `cmd` to completion with inherited stdio.
    pub fn run(&self, cmd: &mut Command) -> Result<()> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        log::debug!("running {:?}", cmd);
        let status = cmd.status().map_err(|source| HarnessError::Spawn {
            program: program.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(HarnessError::Command { program, status })
        }
    }
}

/// `dir/frame_%04d.<ext>`, the ffmpeg input pattern for a frame directory.
pub fn frame_pattern(dir: &Path, format: ImageFormat) -> PathBuf {
    dir.join(format!("frame_%04d.{}", format.extension()))
}

/// GIF frame delay in hundredths of a second for `fps` frames per second.
pub fn gif_delay(fps: u32) -> u32 {
    100 / fps.max(1)
}

/// Sorted frame files in `dir` with the format's extension. An unreadable
/// directory yields no files; the command then reports the problem.
fn frame_files(dir: &Path, format: ImageFormat) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == format.extension()))
            .collect(),
        Err(e) => {
            log::warn!("cannot list {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    files.sort();
    files
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarnessError::io(path, e)),
    }
}
