mod scene;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use shade_raster::{shade, PixelBuffer, ShadingConfig, TracingProgress};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "shade-render", version, about = "Bake stroke-driven face shading textures")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    #[arg(long, default_value_t = 512)]
    width: usize,
    #[arg(long, default_value_t = 512)]
    height: usize,
    /// Box blur kernel size in pixels
    #[arg(long)]
    blur: Option<usize>,
    /// Worker threads
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON scene and write a PNG
    Render {
        scene: PathBuf,
        #[arg(long, default_value = "shade.png")]
        out: PathBuf,
        #[command(flatten)]
        args: RenderArgs,
    },
    /// Render the built-in demo scene
    Demo {
        #[arg(long, default_value = "demo.png")]
        out: PathBuf,
        /// Also write the demo scene as JSON
        #[arg(long)]
        scene_out: Option<PathBuf>,
        #[command(flatten)]
        args: RenderArgs,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn config_for(scene: &Scene, args: &RenderArgs) -> ShadingConfig {
    let mut config = scene.config.unwrap_or_default();
    if let Some(blur) = args.blur {
        config = config.with_blur_size(blur);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    config
}

/// 8-bit RGBA with the first UV row at the bottom of the image.
fn to_png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    let rgba = buffer.to_rgba();
    let stride = buffer.width() * 4;
    rgba.chunks(stride)
        .rev()
        .flatten()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

fn render_scene(scene: &Scene, args: &RenderArgs, out: &Path) -> Result<()> {
    let config = config_for(scene, args);
    let mut buffer = PixelBuffer::new(args.width, args.height);
    let report = shade(&scene.request(), &config, &mut buffer, &TracingProgress)
        .context("shading failed")?;
    info!(
        guide_lines = report.guide_lines,
        shapes = report.shapes.len(),
        "rendered {}x{}",
        args.width,
        args.height
    );

    let width = u32::try_from(args.width)?;
    let height = u32::try_from(args.height)?;
    let img = image::RgbaImage::from_raw(width, height, to_png_bytes(&buffer))
        .ok_or_else(|| anyhow!("Failed to create image from raw"))?;
    img.save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Wrote {}x{} image to {}", args.width, args.height, out.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Render { scene, out, args } => {
            let scene = Scene::load(&scene)?;
            render_scene(&scene, &args, &out)?;
        }
        Command::Demo {
            out,
            scene_out,
            args,
        } => {
            let scene = Scene::demo();
            if let Some(path) = scene_out {
                scene.save(&path)?;
                println!("Wrote demo scene to {}", path.display());
            }
            render_scene(&scene, &args, &out)?;
        }
    }
    Ok(())
}
