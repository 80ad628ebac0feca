//! The set of surfaces rays are traced against.

use crate::{Hit, Ray, Surface, INF};

/// An immutable list of top-level surfaces.
#[derive(Default)]
pub struct Scene {
    surfaces: Vec<Surface>,
}

impl Scene {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    pub fn push(&mut self, surface: impl Into<Surface>) {
        self.surfaces.push(surface.into());
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Leaf primitives across all surfaces, counting each mesh triangle.
    pub fn primitive_count(&self) -> usize {
        self.surfaces.iter().map(Surface::primitive_count).sum()
    }

    /// Nearest hit along `ray`, if any lies closer than [`INF`].
    ///
    /// Ties keep the surface that comes first.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut closest: Option<Hit<'_>> = None;
        let mut closest_t = INF;

        for surface in &self.surfaces {
            if let Some(hit) = surface.intersect(ray) {
                if hit.t > 0.0 && hit.t < closest_t {
                    closest_t = hit.t;
                    closest = Some(hit);
                }
            }
        }

        closest
    }
}
