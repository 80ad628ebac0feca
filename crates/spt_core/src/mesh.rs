//! Quad-indexed mesh data for polygon surfaces.
//!
//! Meshes arrive as a flat list of vertex coordinates and a list of quad
//! faces. Before use they are fitted into a bounding sphere: the raw model
//! is recentered and rescaled so every vertex lies within a target radius
//! of the placement position.

use spt_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors raised while assembling a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    NoVertices,

    #[error("Vertex coordinate count {0} is not a multiple of 3")]
    RaggedCoordinates(usize),

    #[error("Face {face} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },
}

/// A mesh made of quads, each later split into two triangles.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Raw vertex positions in model space
    pub positions: Vec<Vec3>,

    /// Quad faces as four vertex indices
    pub quads: Vec<[usize; 4]>,

    /// Model-space bounds of `positions`
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh, validating the face indices.
    pub fn new(positions: Vec<Vec3>, quads: Vec<[usize; 4]>) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::NoVertices);
        }

        for (face, quad) in quads.iter().enumerate() {
            if let Some(&index) = quad.iter().find(|&&i| i >= positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    count: positions.len(),
                });
            }
        }

        let bounds = Aabb::enclosing(positions.iter().copied());
        Ok(Self {
            positions,
            quads,
            bounds,
        })
    }

    /// Create a mesh from `[x0, y0, z0, x1, y1, z1, ...]`.
    pub fn from_coordinates(coords: &[f64], quads: Vec<[usize; 4]>) -> Result<Self, MeshError> {
        if coords.len() % 3 != 0 {
            return Err(MeshError::RaggedCoordinates(coords.len()));
        }

        let positions = coords
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(positions, quads)
    }

    /// Center of the model-space bounding box.
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Largest distance from the bounds center to any vertex.
    pub fn natural_radius(&self) -> f64 {
        let center = self.center();
        self.positions
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f64::max)
    }

    /// Vertex positions recentered on `position` and scaled to fit `radius`.
    ///
    /// A mesh whose vertices all coincide keeps its scale.
    pub fn fitted(&self, radius: f64, position: Vec3) -> Vec<Vec3> {
        let center = self.center();
        let natural = self.natural_radius();
        let scale = if natural > 0.0 {
            radius / natural
        } else {
            log::warn!("Mesh vertices all coincide; keeping model scale");
            1.0
        };

        self.positions
            .iter()
            .map(|&p| (p - center) * scale + position)
            .collect()
    }

    /// Two triangles per quad, `(a, b, c)` and `(c, d, a)`.
    ///
    /// Triangles that repeat a vertex index are skipped; quads with a
    /// repeated corner encode plain triangles this way.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.quads
            .iter()
            .flat_map(|&[a, b, c, d]| [[a, b, c], [c, d, a]])
            .filter(|&[a, b, c]| a != b && b != c && c != a)
    }
}
