//! Surface abstraction for ray-object intersection.
//!
//! Leaf primitives (spheres, rectangles, triangles) implement [`Shape`].
//! A scene holds top-level [`Surface`]s; a triangle mesh is a surface but
//! not a shape, so every [`Hit`] points at the leaf that was actually hit.

use crate::{Col, PolygonSurface, Plane, Polygon, Ray, Sphere, Vec2, Vec3};

/// Contract of a primitive that can be hit and shaded.
pub trait Shape: Send + Sync {
    /// Distance along the ray to the nearest valid hit, if any.
    fn intersect(&self, ray: &Ray) -> Option<f64>;

    /// Outward normal and material sample at hit point `p`.
    fn position(&self, p: Vec3, ray: &Ray) -> (Vec3, Col);

    /// Surface-space (u, v) coordinate of `p` for texture lookups.
    fn map_to_surface(&self, p: Vec3) -> Vec2;
}

/// A ray hit on a leaf shape.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Distance along the ray
    pub t: f64,
    /// The primitive that was hit
    pub shape: &'a dyn Shape,
}

impl<'a> Hit<'a> {
    pub fn new(t: f64, shape: &'a dyn Shape) -> Self {
        Self { t, shape }
    }
}

/// A top-level scene member.
pub enum Surface {
    Sphere(Sphere),
    Plane(Plane),
    Polygon(Polygon),
    PolygonSurface(PolygonSurface),
}

impl Surface {
    /// Nearest hit on this surface.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        match self {
            Surface::Sphere(sphere) => sphere.intersect(ray).map(|t| Hit::new(t, sphere)),
            Surface::Plane(plane) => plane.intersect(ray).map(|t| Hit::new(t, plane)),
            Surface::Polygon(polygon) => polygon.intersect(ray).map(|t| Hit::new(t, polygon)),
            Surface::PolygonSurface(mesh) => {
                mesh.intersect(ray).map(|(t, face)| Hit::new(t, face))
            }
        }
    }

    /// Number of leaf primitives this surface contributes.
    pub fn primitive_count(&self) -> usize {
        match self {
            Surface::PolygonSurface(mesh) => mesh.faces().len(),
            _ => 1,
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Self {
        Surface::Sphere(sphere)
    }
}

impl From<Plane> for Surface {
    fn from(plane: Plane) -> Self {
        Surface::Plane(plane)
    }
}

impl From<Polygon> for Surface {
    fn from(polygon: Polygon) -> Self {
        Surface::Polygon(polygon)
    }
}

impl From<PolygonSurface> for Surface {
    fn from(mesh: PolygonSurface) -> Self {
        Surface::PolygonSurface(mesh)
    }
}
