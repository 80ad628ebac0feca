use crate::{Interval, Vec3};

/// Axis-aligned bounding box, one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// An AABB that contains nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Smallest AABB enclosing every point.
    ///
    /// Returns `Aabb::EMPTY` for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points.into_iter().fold(Aabb::EMPTY, |bbox, p| bbox.including(p))
    }

    /// Grow the box just enough to contain `p`.
    pub fn including(&self, p: Vec3) -> Self {
        Self {
            x: self.x.including(p.x),
            y: self.y.including(p.y),
            z: self.z.including(p.z),
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }
}
