//! SPT Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer: for every pixel it averages random light
//! paths traced through a fixed scene of spheres, rectangles and
//! triangle meshes.
//!
//! Scenes are immutable once built, so the scanline-parallel renderer
//! reads them from every worker without locking.

mod builder;
mod camera;
mod integrator;
mod material;
mod plane;
mod polygon;
mod polygon_surface;
mod renderer;
mod scene;
mod sphere;
mod surface;
mod texture;

pub use builder::SceneError;
pub use camera::{tent, Camera};
pub use integrator::{radiance, schlick, MAX_DEPTH, RR_DEPTH};
pub use material::{Col, Color, ReflectionKind};
pub use plane::Plane;
pub use polygon::Polygon;
pub use polygon_surface::PolygonSurface;
pub use renderer::{clamp, color_to_rgba, render, to_int, ImageBuffer, RenderConfig, GAMMA};
pub use scene::Scene;
pub use sphere::Sphere;
pub use surface::{Hit, Shape, Surface};
pub use texture::{BitmapTexture, Texture};

/// Re-export vector types from spt_math
pub use spt_math::{Ray, Vec2, Vec3, VecExt};

use rand::{Rng, RngCore};

/// Minimum hit distance; closer hits are the ray leaving its own surface.
pub const EPS: f64 = 1e-4;

/// Distance standing in for "nothing hit".
pub const INF: f64 = 1e20;

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}
