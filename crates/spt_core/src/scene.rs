//! Scene description types.
//!
//! A scene is an ordered list of surfaces plus a camera, described as
//! plain data. Descriptions are deserialized from JSON or taken from the
//! built-in default room; the renderer turns them into intersectable
//! geometry once, before rendering starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid surface {index}: {reason}")]
    InvalidSurface { index: usize, reason: String },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// How light leaving a surface point is distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionKind {
    /// Lambertian scattering over the hemisphere
    #[default]
    Diffuse,
    /// Ideal mirror
    Specular,
    /// Glass: Fresnel-weighted reflection and refraction
    Dielectric,
}

/// Texture attached to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TextureDesc {
    /// Constant material.
    Solid {
        #[serde(default)]
        emission: [f64; 3],
        #[serde(default)]
        color: [f64; 3],
        #[serde(default)]
        reflection: ReflectionKind,
    },
    /// Two diffuse colors alternating in a checkerboard.
    Checker {
        color_a: [f64; 3],
        color_b: [f64; 3],
        /// Period of the pattern in surface-space units
        frequency: f64,
    },
    /// Diffuse color read from an image; transparent pixels cut the surface out.
    Bitmap {
        path: String,
        /// Horizontal wrap-around offset, in surface-space units
        #[serde(default)]
        offset: f64,
        /// Multiplier applied after gamma decoding
        #[serde(default = "default_enhance")]
        enhance: f64,
    },
    /// Area light shaped by the darker regions of an image.
    Emission {
        path: String,
        #[serde(default = "default_emission")]
        emission: [f64; 3],
        /// Pixels with red at or above this value are cut out
        #[serde(default = "default_threshold")]
        threshold: u8,
    },
}

fn default_enhance() -> f64 {
    1.0
}

fn default_emission() -> [f64; 3] {
    [12.0, 12.0, 12.0]
}

fn default_threshold() -> u8 {
    80
}

impl TextureDesc {
    /// Shorthand for a solid texture.
    pub fn solid(emission: [f64; 3], color: [f64; 3], reflection: ReflectionKind) -> Self {
        Self::Solid {
            emission,
            color,
            reflection,
        }
    }
}

/// One top-level surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SurfaceDesc {
    Sphere {
        radius: f64,
        position: [f64; 3],
        texture: TextureDesc,
    },
    /// Rectangle spanning `[x, x + width] x [y, y + height]` in the plane `z = position.z`.
    Plane {
        width: f64,
        height: f64,
        position: [f64; 3],
        texture: TextureDesc,
    },
    /// Single one-sided triangle.
    Polygon {
        vertices: [[f64; 3]; 3],
        texture: TextureDesc,
    },
    /// Quad mesh fitted into a sphere of `radius` around `position`.
    Mesh {
        radius: f64,
        position: [f64; 3],
        /// Flat `[x, y, z, x, y, z, ...]` coordinates
        vertices: Vec<f64>,
        faces: Vec<[usize; 4]>,
        texture: TextureDesc,
    },
}

impl SurfaceDesc {
    pub fn texture(&self) -> &TextureDesc {
        match self {
            SurfaceDesc::Sphere { texture, .. }
            | SurfaceDesc::Plane { texture, .. }
            | SurfaceDesc::Polygon { texture, .. }
            | SurfaceDesc::Mesh { texture, .. } => texture,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            SurfaceDesc::Sphere { radius, .. } | SurfaceDesc::Mesh { radius, .. } => {
                if !(*radius > 0.0) {
                    return Err(format!("radius must be positive, got {radius}"));
                }
            }
            SurfaceDesc::Plane { width, height, .. } => {
                if !(*width > 0.0 && *height > 0.0) {
                    return Err(format!("plane must have positive size, got {width}x{height}"));
                }
            }
            SurfaceDesc::Polygon { .. } => {}
        }

        if let TextureDesc::Checker { frequency, .. } = self.texture() {
            if !(*frequency > 0.0) {
                return Err(format!("checker frequency must be positive, got {frequency}"));
            }
        }
        Ok(())
    }
}

/// Pinhole camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub origin: [f64; 3],
    /// Viewing direction; normalized by the renderer
    pub direction: [f64; 3],
    /// Half-extent of the image plane per unit of view distance
    pub fov_scale: f64,
    /// Distance camera rays are pushed forward before tracing
    pub near_offset: f64,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            origin: [50.0, 52.0, 295.6],
            direction: [0.0, -0.042612, -1.0],
            fov_scale: 0.5135,
            near_offset: 140.0,
        }
    }
}

/// A complete scene: camera plus ordered surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDesc,

    pub surfaces: Vec<SurfaceDesc>,

    /// Directory asset paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    /// A scene with the default camera and the given surfaces.
    pub fn new(surfaces: Vec<SurfaceDesc>) -> Self {
        Self {
            camera: CameraDesc::default(),
            surfaces,
            base_dir: None,
        }
    }

    /// Parse and validate a JSON scene description.
    pub fn from_json(json: &str) -> LoadResult<Self> {
        let desc: SceneDescription = serde_json::from_str(json)?;
        desc.validate()?;
        Ok(desc)
    }

    /// Check the geometric constraints serde cannot express.
    pub fn validate(&self) -> LoadResult<()> {
        for (index, surface) in self.surfaces.iter().enumerate() {
            surface
                .validate()
                .map_err(|reason| LoadError::InvalidSurface { index, reason })?;
        }
        Ok(())
    }

    /// The default room: six giant spheres as walls, a mirror ball, a
    /// glass ball, a spherical ceiling light, a checkered poster on the
    /// back wall and a small cube.
    pub fn cornell_box() -> Self {
        use ReflectionKind::*;

        let wall = |position: [f64; 3], color: [f64; 3]| SurfaceDesc::Sphere {
            radius: 1e5,
            position,
            texture: TextureDesc::solid([0.0; 3], color, Diffuse),
        };

        let surfaces = vec![
            wall([1e5 + 1.0, 40.8, 81.6], [0.75, 0.25, 0.25]), // Left
            wall([-1e5 + 99.0, 40.8, 81.6], [0.25, 0.25, 0.75]), // Right
            wall([50.0, 40.8, 1e5], [0.75, 0.75, 0.75]),       // Back
            wall([50.0, 40.8, -1e5 + 170.0], [0.0; 3]),        // Front
            wall([50.0, 1e5, 81.6], [0.75, 0.75, 0.75]),       // Bottom
            wall([50.0, -1e5 + 81.6, 81.6], [0.75, 0.75, 0.75]), // Top
            SurfaceDesc::Sphere {
                radius: 16.5,
                position: [27.0, 16.5, 47.0],
                texture: TextureDesc::solid([0.0; 3], [0.999; 3], Specular),
            },
            SurfaceDesc::Sphere {
                radius: 16.5,
                position: [73.0, 16.5, 78.0],
                texture: TextureDesc::solid([0.0; 3], [0.999; 3], Dielectric),
            },
            SurfaceDesc::Sphere {
                radius: 600.0,
                position: [50.0, 681.6 - 0.27, 81.6],
                texture: TextureDesc::solid([12.0; 3], [0.0; 3], Diffuse),
            },
            SurfaceDesc::Plane {
                width: 60.0,
                height: 24.0,
                position: [20.0, 48.0, 1.0],
                texture: TextureDesc::Checker {
                    color_a: [0.8, 0.8, 0.2],
                    color_b: [0.1, 0.1, 0.1],
                    frequency: 0.125,
                },
            },
            SurfaceDesc::Mesh {
                radius: 7.0,
                position: [50.0, 4.1, 100.0],
                vertices: CUBE_VERTICES.to_vec(),
                faces: CUBE_FACES.to_vec(),
                texture: TextureDesc::solid([0.0; 3], [0.25, 0.5, 0.75], Diffuse),
            },
        ];

        Self::new(surfaces)
    }
}

const CUBE_VERTICES: [f64; 24] = [
    -1.0, -1.0, -1.0, //
    1.0, -1.0, -1.0, //
    1.0, 1.0, -1.0, //
    -1.0, 1.0, -1.0, //
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
    1.0, 1.0, 1.0, //
    -1.0, 1.0, 1.0,
];

// Wound so each face normal points out of the cube.
const CUBE_FACES: [[usize; 4]; 6] = [
    [4, 7, 6, 5],
    [0, 1, 2, 3],
    [1, 5, 6, 2],
    [0, 3, 7, 4],
    [3, 2, 6, 7],
    [0, 4, 5, 1],
];

/// Load a scene description from a JSON file.
///
/// Relative asset paths inside the file resolve against its directory.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let mut desc = SceneDescription::from_json(&json)?;
    desc.base_dir = path.parent().map(Path::to_path_buf);

    log::info!(
        "Loaded scene {} ({} surfaces)",
        path.display(),
        desc.surfaces.len()
    );
    Ok(desc)
}
