//! Textures: mapping a surface point to a material sample.
//!
//! Every texture answers two questions about a hit point: which [`Col`]
//! it has, and whether the point exists at all (the cutout test).

use std::sync::Arc;

use spt_core::Raster;

use crate::{Col, Color, ReflectionKind, Shape, Vec2, Vec3, GAMMA};

/// A raster sampled through a surface's (u, v) mapping.
#[derive(Debug, Clone)]
pub struct BitmapTexture {
    raster: Arc<Raster>,
    /// Horizontal wrap-around offset in u
    offset: f64,
    /// Multiplier applied after gamma decoding
    enhance: f64,
}

impl BitmapTexture {
    pub fn new(raster: Arc<Raster>, offset: f64, enhance: f64) -> Self {
        Self {
            raster,
            offset,
            enhance,
        }
    }

    /// Raw RGBA under surface coordinate `uv`.
    ///
    /// u wraps around the raster width; v is flipped (v = 1 is the top
    /// row) and clamped.
    pub fn sample(&self, uv: Vec2) -> [u8; 4] {
        let width = self.raster.width as i64;
        let height = self.raster.height as i64;

        let x = (((uv.x + self.offset) * width as f64) as i64).rem_euclid(width);
        let y = (((1.0 - uv.y) * height as f64) as i64).clamp(0, height - 1);

        self.raster.pixel(x as u32, y as u32)
    }

    /// Linear intensity of an 8-bit channel.
    fn decode(&self, channel: u8) -> f64 {
        (channel as f64 / 255.0).powf(GAMMA) * self.enhance
    }
}

/// Surface appearance.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same sample everywhere.
    Solid(Col),

    /// Two samples alternating with the parity of the (u, v) cell.
    Checker { a: Col, b: Col, frequency: f64 },

    /// Diffuse color from an image; transparent pixels are holes.
    Bitmap(BitmapTexture),

    /// Light emitted through the dark, opaque parts of an image.
    Emission {
        bitmap: BitmapTexture,
        emission: Color,
        /// Red values at or above this are cut out
        threshold: u8,
    },
}

impl Texture {
    /// Material sample at `p` on `shape`.
    pub fn col(&self, shape: &dyn Shape, p: Vec3) -> Col {
        match self {
            Texture::Solid(col) => *col,
            Texture::Checker { a, b, frequency } => {
                let uv = shape.map_to_surface(p);
                if checker_parity(uv, *frequency) {
                    *a
                } else {
                    *b
                }
            }
            Texture::Bitmap(bitmap) => {
                let [r, g, b, _] = bitmap.sample(shape.map_to_surface(p));
                Col::diffuse(Color::new(
                    bitmap.decode(r),
                    bitmap.decode(g),
                    bitmap.decode(b),
                ))
            }
            Texture::Emission { emission, .. } => {
                Col::new(*emission, Color::ZERO, ReflectionKind::Diffuse)
            }
        }
    }

    /// Cutout test: false means the ray passes through `p`.
    pub fn is_hit(&self, shape: &dyn Shape, p: Vec3) -> bool {
        match self {
            Texture::Solid(_) | Texture::Checker { .. } => true,
            Texture::Bitmap(bitmap) => {
                let [_, _, _, alpha] = bitmap.sample(shape.map_to_surface(p));
                alpha != 0
            }
            Texture::Emission {
                bitmap, threshold, ..
            } => {
                let [red, _, _, alpha] = bitmap.sample(shape.map_to_surface(p));
                alpha != 0 && red < *threshold
            }
        }
    }
}

/// True on the "a" cells of a checkerboard with period `frequency`.
fn checker_parity(uv: Vec2, frequency: f64) -> bool {
    let fu = (uv.x / frequency).rem_euclid(1.0);
    let fv = (uv.y / frequency).rem_euclid(1.0);
    (fu - 0.5) * (fv - 0.5) > 0.0
}
