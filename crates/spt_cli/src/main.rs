//! spt - render a scene to an image file.

mod cli;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use spt_core::{load_scene, SceneDescription};
use spt_renderer::{render, Camera, Scene};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = args.render_config();

    let desc = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the built-in room");
            SceneDescription::cornell_box()
        }
    };

    let scene = Scene::build(&desc).context("Failed to build scene")?;
    let camera = Camera::new(&desc.camera, config.width, config.height);

    let start = Instant::now();
    let buffer = render(&scene, &camera, &config);
    log::info!(
        "Samples:{} Time:{:.2?}",
        config.effective_samples(),
        start.elapsed()
    );

    let rgba = buffer.to_rgba8();
    image::save_buffer(
        &args.output,
        bytemuck::cast_slice(&rgba),
        buffer.width,
        buffer.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
