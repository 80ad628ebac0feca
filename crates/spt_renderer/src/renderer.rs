//! Scanline-parallel pixel sampler and tone mapping.
//!
//! Every image row is an independent unit of work with its own random
//! stream, so rows run on the rayon pool without sharing anything but the
//! read-only scene. Each pixel averages 2x2 sub-pixels; each sub-pixel
//! averages tent-jittered camera rays and is clamped before it is added.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use spt_math::Interval;

use crate::{radiance, Camera, Color, Scene};

/// Display gamma used to encode output and decode bitmap textures.
pub const GAMMA: f64 = 2.2;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Camera rays per pixel, split evenly over the 2x2 sub-pixels
    pub samples_per_pixel: u32,
    /// Base seed for the per-row random streams; random when unset
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            samples_per_pixel: 40,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Rays traced per sub-pixel; never less than one.
    pub fn subpixel_samples(&self) -> u32 {
        (self.samples_per_pixel / 4).max(1)
    }

    /// Rays actually traced per pixel.
    pub fn effective_samples(&self) -> u32 {
        self.subpixel_samples() * 4
    }
}

/// Clamp a channel to [0, 1]; NaN maps to 0.
#[inline]
pub fn clamp(x: f64) -> f64 {
    Interval::UNIT.clamp(x)
}

/// Gamma-encode a linear channel to 8 bits.
#[inline]
pub fn to_int(x: f64) -> u8 {
    let encoded = (clamp(x).powf(1.0 / GAMMA) * 255.0 + 0.5) as u32;
    encoded.min(255) as u8
}

/// Convert a color to opaque 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    [to_int(color.x), to_int(color.y), to_int(color.z), 255]
}

/// Linear radiance per pixel, row 0 at the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Tone-mapped pixels, ready for an image encoder.
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels.iter().copied().map(color_to_rgba).collect()
    }
}

/// Seed for the random stream of camera row `y`.
fn row_seed(base: u64, y: u32) -> u64 {
    base ^ (y as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render `scene` as seen by `camera`.
///
/// The output size is the camera's; `config` supplies the sample count
/// and seed. With a fixed seed the result does not depend on how rows are
/// scheduled across threads.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let width = camera.width();
    let height = camera.height();
    let mut image = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }

    let samples = config.subpixel_samples();
    let base_seed = config.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} at {} spp ({} surfaces, {} primitives)",
        width,
        height,
        samples * 4,
        scene.len(),
        scene.primitive_count()
    );

    let start = Instant::now();
    let rows_done = AtomicUsize::new(0);
    let report_every = (height as usize / 10).max(1);

    image
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            // Camera y counts up from the bottom
            let y = height - 1 - row as u32;
            let mut rng = StdRng::seed_from_u64(row_seed(base_seed, y));

            for (x, pixel) in pixels.iter_mut().enumerate() {
                for sy in 0..2 {
                    for sx in 0..2 {
                        let mut sum = Color::ZERO;
                        for _ in 0..samples {
                            let ray = camera.get_ray(x as u32, y, sx, sy, &mut rng);
                            sum += radiance(scene, &ray, 0, &mut rng);
                        }
                        let r = sum * (1.0 / samples as f64);
                        *pixel += Color::new(clamp(r.x), clamp(r.y), clamp(r.z)) * 0.25;
                    }
                }
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 {
                log::debug!("Rendered {}/{} rows", done, height);
            }
        });

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use spt_core::CameraDesc;

    use super::*;
    use crate::{Col, Plane, ReflectionKind, Sphere, Texture, Vec3};

    fn solid(emission: Color, color: Color, reflection: ReflectionKind) -> Arc<Texture> {
        Arc::new(Texture::Solid(Col::new(emission, color, reflection)))
    }

    fn config(width: u32, height: u32, samples_per_pixel: u32, seed: u64) -> RenderConfig {
        RenderConfig {
            width,
            height,
            samples_per_pixel,
            seed: Some(seed),
        }
    }

    fn render_with(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
        let camera = Camera::new(&CameraDesc::default(), config.width, config.height);
        render(scene, &camera, config)
    }

    /// Emissive sphere large enough to surround the camera.
    fn glowing_shell(emission: f64) -> Scene {
        let origin = Vec3::from_array(CameraDesc::default().origin);
        Scene::new(vec![Sphere::new(
            origin,
            1e4,
            solid(Color::splat(emission), Color::ZERO, ReflectionKind::Diffuse),
        )
        .into()])
    }

    /// Diffuse shell around the camera lit by one small sphere.
    fn diffuse_room() -> Scene {
        let wall = solid(Color::ZERO, Color::splat(0.6), ReflectionKind::Diffuse);
        let light = solid(Color::splat(3.0), Color::ZERO, ReflectionKind::Diffuse);
        Scene::new(vec![
            Sphere::new(Vec3::new(50.0, 52.0, 200.0), 300.0, wall).into(),
            Sphere::new(Vec3::new(50.0, 200.0, 150.0), 60.0, light).into(),
        ])
    }

    /// Mean over pixels of the per-pixel variance across seeds.
    fn mean_pixel_variance(scene: &Scene, samples_per_pixel: u32) -> f64 {
        let renders: Vec<Vec<f64>> = (0..6)
            .map(|seed| {
                render_with(scene, &config(16, 12, samples_per_pixel, seed))
                    .pixels
                    .iter()
                    .map(|c| c.x)
                    .collect()
            })
            .collect();

        let n = renders.len() as f64;
        let pixels = renders[0].len();
        let total: f64 = (0..pixels)
            .map(|i| {
                let mean = renders.iter().map(|r| r[i]).sum::<f64>() / n;
                renders.iter().map(|r| (r[i] - mean).powi(2)).sum::<f64>() / n
            })
            .sum();
        total / pixels as f64
    }

    #[test]
    fn test_subpixel_samples() {
        assert_eq!(config(1, 1, 40, 0).subpixel_samples(), 10);
        assert_eq!(config(1, 1, 7, 0).subpixel_samples(), 1);
        assert_eq!(config(1, 1, 1, 0).subpixel_samples(), 1);
        assert_eq!(config(1, 1, 0, 0).effective_samples(), 4);
        assert_eq!(RenderConfig::default().effective_samples(), 40);
    }

    #[test]
    fn test_to_int_bounds_and_monotone() {
        assert_eq!(to_int(0.0), 0);
        assert_eq!(to_int(1.0), 255);
        assert_eq!(to_int(-3.0), 0);
        assert_eq!(to_int(42.0), 255);
        assert_eq!(to_int(f64::NAN), 0);

        let mut last = 0;
        for i in -20..=220 {
            let v = to_int(i as f64 / 200.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_to_int_gamma_encodes() {
        // 0.5 ^ (1 / 2.2) * 255 = 186.1
        assert_eq!(to_int(0.5), 186);
        assert_eq!(color_to_rgba(Color::new(0.0, 0.5, 1.0)), [0, 186, 255, 255]);
    }

    #[test]
    fn test_empty_scene_renders_black() {
        let scene = Scene::default();

        for spp in [1, 8] {
            let image = render_with(&scene, &config(8, 6, spp, 3));
            assert!(image.pixels.iter().all(|&c| c == Color::ZERO));
            assert!(image.to_rgba8().iter().all(|&p| p == [0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_emissive_surface_fills_image() {
        for (emission, expected) in [(1.0, 255), (0.5, to_int(0.5))] {
            let image = render_with(&glowing_shell(emission), &config(8, 6, 1, 5));

            for pixel in image.to_rgba8() {
                assert_eq!(pixel, [expected, expected, expected, 255]);
            }
        }
    }

    #[test]
    fn test_top_row_is_first() {
        // Light covering everything above y = 52, in front of the camera
        let light = solid(Color::ONE, Color::ZERO, ReflectionKind::Diffuse);
        let scene = Scene::new(vec![Plane::new(
            Vec3::new(-1000.0, 52.0, 0.0),
            2000.0,
            1000.0,
            light,
        )
        .into()]);

        let image = render_with(&scene, &config(8, 8, 4, 9));
        assert_eq!(image.get(0, 0), Color::ONE);
        assert_eq!(image.get(7, 0), Color::ONE);
        assert_eq!(image.get(0, 7), Color::ZERO);
        assert_eq!(image.get(7, 7), Color::ZERO);
    }

    #[test]
    fn test_seeded_render_is_deterministic() {
        let scene = diffuse_room();

        let a = render_with(&scene, &config(12, 8, 4, 42));
        let b = render_with(&scene, &config(12, 8, 4, 42));
        assert_eq!(a.pixels, b.pixels);

        let c = render_with(&scene, &config(12, 8, 4, 43));
        assert_ne!(a.pixels, c.pixels);
    }

    #[test]
    fn test_more_samples_reduce_variance() {
        let scene = diffuse_room();

        let low = mean_pixel_variance(&scene, 4);
        let mid = mean_pixel_variance(&scene, 16);
        let high = mean_pixel_variance(&scene, 64);

        assert!(low > 0.0);
        assert!(mid < low, "variance {mid} at 16 spp vs {low} at 4 spp");
        assert!(high < mid, "variance {high} at 64 spp vs {mid} at 16 spp");
    }
}
