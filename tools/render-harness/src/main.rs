// Command-line front end for the render harness.
//
// Usage:
//   render-harness [-c <config.json>] apply <job.json>
//   render-harness [-c <config.json>] video <frames_dir> <out.mp4> <width> <height> <fps>
//   render-harness [-c <config.json>] gif <frames_dir> <out.gif> <fps>
//   render-harness [-c <config.json>] montage <frames_dir> <out.png> <columns>
//   render-harness [-c <config.json>] mix <video> <audio> <out>
//   render-harness filters

use std::path::Path;
use std::process;
use std::str::FromStr;

use anyhow::{bail, Context};
use raster_fx::pipeline::Filter;
use render_harness::{ApplyJob, HarnessConfig, Tools};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first().map(String::as_str) {
        Some("-c") => {
            if args.len() < 2 {
                bail!("-c needs a config file");
            }
            let path = args[1].clone();
            args.drain(..2);
            HarnessConfig::load(Path::new(&path))
                .with_context(|| format!("loading config {}", path))?
        }
        _ => HarnessConfig::default(),
    };

    if args.is_empty() {
        print_usage();
        process::exit(1);
    }

    let tools = Tools::new(config);
    match args[0].as_str() {
        "apply" => cmd_apply(&args[1..]),
        "video" => cmd_video(&tools, &args[1..]),
        "gif" => cmd_gif(&tools, &args[1..]),
        "montage" => cmd_montage(&tools, &args[1..]),
        "mix" => cmd_mix(&tools, &args[1..]),
        "filters" => {
            cmd_filters();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[0]);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("render-harness - batch rendering for raster-fx");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c <config.json>   tool names, image format, output dir, crf");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  apply <job.json>");
    eprintln!("      Load an image, run a filter pipeline on it and save the result.");
    eprintln!();
    eprintln!("  video <frames_dir> <out.mp4> <width> <height> <fps>");
    eprintln!("      Encode frame_%04d images as H.264 with ffmpeg.");
    eprintln!();
    eprintln!("  gif <frames_dir> <out.gif> <fps>");
    eprintln!("      Encode frame_%04d images as a GIF with ffmpeg.");
    eprintln!();
    eprintln!("  montage <frames_dir> <out.png> <columns>");
    eprintln!("      Tile frames into one image with ImageMagick.");
    eprintln!();
    eprintln!("  mix <video> <audio> <out>");
    eprintln!("      Add an audio track to a video.");
    eprintln!();
    eprintln!("  filters");
    eprintln!("      List pipeline filter names.");
}

fn parse<T>(value: &str, what: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid {}: {}", what, value))
}

fn expect_args(args: &[String], n: usize, usage: &str) -> anyhow::Result<()> {
    if args.len() < n {
        bail!("usage: render-harness {}", usage);
    }
    Ok(())
}

fn cmd_apply(args: &[String]) -> anyhow::Result<()> {
    expect_args(args, 1, "apply <job.json>")?;
    let job = ApplyJob::load(Path::new(&args[0]))
        .with_context(|| format!("loading job {}", args[0]))?;
    let out = job.run().context("running job")?;
    log::info!("wrote {}", out.display());
    Ok(())
}

fn cmd_video(tools: &Tools, args: &[String]) -> anyhow::Result<()> {
    expect_args(args, 5, "video <frames_dir> <out.mp4> <width> <height> <fps>")?;
    let width: u32 = parse(&args[2], "width")?;
    let height: u32 = parse(&args[3], "height")?;
    let fps: u32 = parse(&args[4], "fps")?;
    tools
        .convert_to_video(Path::new(&args[0]), Path::new(&args[1]), width, height, fps)
        .context("encoding video")?;
    Ok(())
}

fn cmd_gif(tools: &Tools, args: &[String]) -> anyhow::Result<()> {
    expect_args(args, 3, "gif <frames_dir> <out.gif> <fps>")?;
    let fps: u32 = parse(&args[2], "fps")?;
    tools
        .ffmpeg_to_gif(Path::new(&args[0]), Path::new(&args[1]), fps)
        .context("encoding gif")?;
    Ok(())
}

fn cmd_montage(tools: &Tools, args: &[String]) -> anyhow::Result<()> {
    expect_args(args, 3, "montage <frames_dir> <out.png> <columns>")?;
    let columns: u32 = parse(&args[2], "columns")?;
    tools
        .make_montage(columns, Path::new(&args[0]), Path::new(&args[1]))
        .context("making montage")?;
    Ok(())
}

fn cmd_mix(tools: &Tools, args: &[String]) -> anyhow::Result<()> {
    expect_args(args, 3, "mix <video> <audio> <out>")?;
    tools
        .mix_av(Path::new(&args[0]), Path::new(&args[1]), Path::new(&args[2]))
        .context("mixing audio and video")?;
    Ok(())
}

fn cmd_filters() {
    println!("Available filters:");
    for name in Filter::NAMES {
        println!("  {}", name);
    }
}
