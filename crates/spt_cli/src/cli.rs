use std::path::PathBuf;

use clap::Parser;
use spt_renderer::RenderConfig;

/// Render a scene with Monte Carlo path tracing and save it as an image.
#[derive(Parser, Debug)]
#[command(name = "spt", version, about)]
pub struct Args {
    /// Samples per pixel, split over 2x2 sub-pixels
    #[arg(default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..))]
    pub samples: u32,

    /// Image width in pixels
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Output image path; the format follows the extension
    #[arg(short, long, default_value = "image.png")]
    pub output: PathBuf,

    /// JSON scene description; the built-in room when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Seed for a reproducible render
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples,
            seed: self.seed,
        }
    }
}
