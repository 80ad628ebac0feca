//! Vector algebra for the path tracer.
//!
//! Positions, directions and linear RGB colors all share one
//! double-precision 3-vector type, re-exported from glam.

pub use glam::{DVec2, DVec3};

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Position, direction or linear RGB color.
pub type Vec3 = DVec3;

/// Surface-space (u, v) coordinate.
pub type Vec2 = DVec2;

/// Operations the engine needs on top of glam.
pub trait VecExt {
    /// Unit vector in the same direction.
    ///
    /// A zero-length vector has no direction; it maps to `Vec3::X`
    /// instead of producing NaNs.
    fn normalized(self) -> Self;

    /// Largest of the three components (the "max reflectance" of a color).
    fn max_component(self) -> f64;
}

impl VecExt for Vec3 {
    #[inline]
    fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Vec3::X
        } else {
            self / len
        }
    }

    #[inline]
    fn max_component(self) -> f64 {
        self.x.max(self.y.max(self.z))
    }
}
