//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{surface::Shape, Col, Ray, Texture, Vec2, Vec3, VecExt, EPS};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f64,
    texture: Arc<Texture>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, texture: Arc<Texture>) -> Self {
        Self {
            center,
            radius,
            texture,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Shape for Sphere {
    /// Solves `t^2 - 2bt + (|op|^2 - r^2) = 0` for a unit direction.
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let op = self.center - ray.origin;
        let b = op.dot(ray.direction);
        let det = b * b - op.length_squared() + self.radius * self.radius;
        if det < 0.0 {
            return None;
        }

        let det = det.sqrt();

        // Nearest root first; the far one when the ray starts inside
        [b - det, b + det].into_iter().find(|&t| t > EPS)
    }

    fn position(&self, p: Vec3, _ray: &Ray) -> (Vec3, Col) {
        let normal = (p - self.center).normalized();
        (normal, self.texture.col(self, p))
    }

    /// Longitude to u (mirrored), latitude to v.
    fn map_to_surface(&self, p: Vec3) -> Vec2 {
        let local = (p - self.center) / self.radius;
        let phi = local.z.atan2(local.x);
        let theta = local.y.clamp(-1.0, 1.0).asin();

        Vec2::new(1.0 - (phi + PI) / (2.0 * PI), (theta + PI / 2.0) / PI)
    }
}
