//! Axis-aligned rectangle facing the z axis.

use std::sync::Arc;

use spt_math::Interval;

use crate::{surface::Shape, Col, Ray, Texture, Vec2, Vec3, EPS};

/// A `width` x `height` rectangle in the plane `z = position.z`, with its
/// lower-left corner at `position`.
pub struct Plane {
    position: Vec3,
    width: f64,
    height: f64,
    texture: Arc<Texture>,
}

impl Plane {
    pub fn new(position: Vec3, width: f64, height: f64, texture: Arc<Texture>) -> Self {
        Self {
            position,
            width,
            height,
            texture,
        }
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        // Parallel to the plane
        if ray.direction.z.abs() < EPS {
            return None;
        }

        let t = (self.position.z - ray.origin.z) / ray.direction.z;
        if t <= EPS {
            return None;
        }

        let p = ray.at(t);
        let local = p - self.position;
        let inside = Interval::new(0.0, self.width).contains(local.x)
            && Interval::new(0.0, self.height).contains(local.y);
        if !inside || !self.texture.is_hit(self, p) {
            return None;
        }

        Some(t)
    }

    /// The normal faces whichever side the ray arrives from.
    fn position(&self, p: Vec3, ray: &Ray) -> (Vec3, Col) {
        let normal = if ray.direction.z > 0.0 {
            Vec3::NEG_Z
        } else {
            Vec3::Z
        };
        (normal, self.texture.col(self, p))
    }

    fn map_to_surface(&self, p: Vec3) -> Vec2 {
        Vec2::new(
            (p.x - self.position.x) / self.width,
            (p.y - self.position.y) / self.height,
        )
    }
}
