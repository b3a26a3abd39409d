//! Rendering frame functions to image files.
//!
//! A frame function receives a buffer, the frame size and the animation
//! progress `percent` in `[0, 1)`, and draws the frame into the buffer.
//! Frame sequences are written as `frame_0000.<ext>`, `frame_0001.<ext>`, …
//! which is the pattern the ffmpeg commands in [`crate::tools`] read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use raster_fx::{PixelBuffer, Rgba8};

use crate::config::ImageFormat;
use crate::error::{HarnessError, Result};
use crate::progress::Progress;

/// A boxed `FnMut(buffer, width, height, percent)`, as stored by programs
/// and movies.
pub type FrameFunc = Box<dyn FnMut(&mut PixelBuffer, f64, f64, f64)>;

/// Path of frame `frame` inside `dir`.
pub fn frame_path(dir: &Path, frame: usize, format: ImageFormat) -> PathBuf {
    dir.join(format!("frame_{:04}.{}", frame, format.extension()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// Render one frame at `percent` and save it to `path` (format by extension).
pub fn image<F>(
    width: u32,
    height: u32,
    path: &Path,
    mut frame_func: F,
    percent: f64,
) -> Result<()>
where
    F: FnMut(&mut PixelBuffer, f64, f64, f64),
{
    log::info!("generating image...");
    let mut buf = PixelBuffer::new(width, height);
    frame_func(&mut buf, width as f64, height as f64, percent);
    ensure_parent(path)?;
    buf.save(path)?;
    let size = fs::metadata(path)
        .map_err(|e| HarnessError::io(path, e))?
        .len();
    log::info!(
        "image complete: {} ({}x{}, {:.2} kb)",
        path.display(),
        width,
        height,
        size as f64 / 1000.0
    );
    Ok(())
}

/// Remove `dir` and everything in it, then recreate it empty.
pub fn clean_frames(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(HarnessError::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))
}

/// Render frames `0..count` into a freshly cleaned `dir`.
///
/// One buffer is reused for the whole sequence, so a frame function that
/// does not clear the buffer draws over the previous frame.
pub fn frames<F>(
    name: &str,
    width: u32,
    height: u32,
    count: usize,
    dir: &Path,
    format: ImageFormat,
    mut frame_func: F,
) -> Result<()>
where
    F: FnMut(&mut PixelBuffer, f64, f64, f64),
{
    clean_frames(dir)?;
    let progress = Progress::start(name, count);
    let mut buf = PixelBuffer::new(width, height);
    for frame in 0..count {
        let percent = frame as f64 / count as f64;
        progress.update(frame, percent);
        frame_func(&mut buf, width as f64, height as f64, percent);
        buf.save(frame_path(dir, frame, format))?;
    }
    progress.complete();
    Ok(())
}

/// Like [`frames`], but every frame gets its own zeroed buffer and frames
/// render concurrently.
pub fn frames_parallel<F>(
    name: &str,
    width: u32,
    height: u32,
    count: usize,
    dir: &Path,
    format: ImageFormat,
    frame_func: F,
) -> Result<()>
where
    F: Fn(&mut PixelBuffer, f64, f64, f64) + Sync,
{
    clean_frames(dir)?;
    let progress = Progress::start(name, count);
    let done = AtomicUsize::new(0);
    (0..count).into_par_iter().try_for_each(|frame| -> Result<()> {
        let percent = frame as f64 / count as f64;
        let mut buf = PixelBuffer::new(width, height);
        frame_func(&mut buf, width as f64, height as f64, percent);
        buf.save(frame_path(dir, frame, format))?;
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.update(finished, finished as f64 / count as f64);
        Ok(())
    })?;
    progress.complete();
    Ok(())
}

/// Render the inclusive frame range `start..=end` of a `count`-frame
/// sequence into `dir`, leaving other frames in `dir` alone.
#[allow(clippy::too_many_arguments)]
pub fn frame_range<F>(
    width: u32,
    height: u32,
    count: usize,
    start: usize,
    end: usize,
    dir: &Path,
    format: ImageFormat,
    mut frame_func: F,
) -> Result<()>
where
    F: FnMut(&mut PixelBuffer, f64, f64, f64),
{
    fs::create_dir_all(dir).map_err(|e| HarnessError::io(dir, e))?;
    let progress = Progress::start(format!("range: {}-{}", start, end), count);
    let mut buf = PixelBuffer::new(width, height);
    for frame in start..=end {
        let percent = frame as f64 / count as f64;
        progress.update(frame, percent);
        frame_func(&mut buf, width as f64, height as f64, percent);
        buf.save(frame_path(dir, frame, format))?;
    }
    progress.complete();
    Ok(())
}

/// Cells per side of a square sprite sheet holding `count` frames.
pub fn sheet_columns(count: usize) -> u32 {
    (count as f64).sqrt().ceil() as u32
}

/// Render `count` frames into a square grid on one image.
///
/// Each cell is drawn in its own `width × height` buffer cleared to `bg`, so
/// a frame function can clear or fill its whole buffer without touching the
/// neighbors.
pub fn sprite_sheet<F>(
    width: u32,
    height: u32,
    bg: Rgba8,
    path: &Path,
    count: usize,
    mut frame_func: F,
) -> Result<()>
where
    F: FnMut(&mut PixelBuffer, f64, f64, f64),
{
    let cols = sheet_columns(count);
    let mut sheet = PixelBuffer::filled(width * cols, height * cols, bg);
    let progress = Progress::start("sprite sheet", count);
    let mut cell = PixelBuffer::new(width, height);
    for i in 0..count {
        let percent = i as f64 / count as f64;
        progress.update(i, percent);
        cell.fill(bg);
        frame_func(&mut cell, width as f64, height as f64, percent);
        let col = i as u32 % cols;
        let row = i as u32 / cols;
        sheet.blit(&cell, (col * width) as i32, (row * height) as i32);
    }
    ensure_parent(path)?;
    sheet.save(path)?;
    progress.complete();
    Ok(())
}
