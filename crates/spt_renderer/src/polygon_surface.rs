//! Triangle mesh surface.
//!
//! A mesh is fitted into a bounding sphere at build time; rays that miss
//! the sphere skip the per-face tests entirely.

use std::sync::Arc;

use spt_core::Mesh;

use crate::{surface::Shape, Col, Polygon, Ray, Sphere, Texture, Vec3, INF};

/// A collection of triangles sharing one texture.
pub struct PolygonSurface {
    /// Sphere enclosing every face
    bound: Sphere,
    faces: Vec<Polygon>,
}

impl PolygonSurface {
    /// Fit `mesh` into a sphere of `radius` around `position` and split its
    /// quads into triangles.
    pub fn new(mesh: &Mesh, radius: f64, position: Vec3, texture: Arc<Texture>) -> Self {
        let vertices = mesh.fitted(radius, position);
        let faces: Vec<Polygon> = mesh
            .triangles()
            .map(|[a, b, c]| Polygon::new(vertices[a], vertices[b], vertices[c], texture.clone()))
            .collect();

        log::debug!(
            "Polygon surface: {} vertices, {} quads -> {} triangles",
            vertices.len(),
            mesh.quads.len(),
            faces.len()
        );

        // Only the bound's geometry is used
        let bound_texture = Arc::new(Texture::Solid(Col::diffuse(Vec3::ZERO)));

        Self {
            bound: Sphere::new(position, radius, bound_texture),
            faces,
        }
    }

    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    /// Nearest face hit and its distance.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, &Polygon)> {
        if self.bound.intersect(ray).is_none() {
            return None;
        }

        let mut nearest: Option<(f64, &Polygon)> = None;
        for face in &self.faces {
            if let Some(t) = face.intersect(ray) {
                if t < nearest.map_or(INF, |(best, _)| best) {
                    nearest = Some((t, face));
                }
            }
        }
        nearest
    }
}
