//! One-sided triangle primitive.
//!
//! Intersection solves `origin + t * dir = p2 + u * e1 + v * e2` with
//! Cramer's rule; only rays hitting the side the normal points to count.

use std::sync::Arc;

use crate::{surface::Shape, Col, Ray, Texture, Vec2, Vec3, VecExt, EPS};

/// Determinant of the 3x3 matrix with columns `a`, `b`, `c`.
#[inline]
fn det(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    a.dot(b.cross(c))
}

/// A flat-shaded triangle.
pub struct Polygon {
    /// Shared corner the edges start from
    origin: Vec3,
    e1: Vec3,
    e2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    texture: Arc<Texture>,
}

impl Polygon {
    /// Triangle `(p1, p2, p3)`; the normal is `(p1 - p2) x (p3 - p2)`.
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3, texture: Arc<Texture>) -> Self {
        let e1 = p1 - p2;
        let e2 = p3 - p2;
        let normal = e1.cross(e2).normalized();

        Self {
            origin: p2,
            e1,
            e2,
            normal,
            texture,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Shape for Polygon {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let back = -ray.direction;
        let denom = det(self.e1, self.e2, back);

        // Back face or parallel
        if denom <= 0.0 {
            return None;
        }

        let d = ray.origin - self.origin;
        let u = det(d, self.e2, back) / denom;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v = det(self.e1, d, back) / denom;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = det(self.e1, self.e2, d) / denom;
        (t > EPS).then_some(t)
    }

    fn position(&self, p: Vec3, _ray: &Ray) -> (Vec3, Col) {
        (self.normal, self.texture.col(self, p))
    }

    /// Triangles carry no surface parameterization.
    fn map_to_surface(&self, _p: Vec3) -> Vec2 {
        Vec2::ZERO
    }
}
