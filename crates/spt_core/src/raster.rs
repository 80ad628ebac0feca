//! Bitmap assets for textured surfaces.
//!
//! Rasters are kept as raw 8-bit RGBA: bitmap textures apply their own
//! gamma decoding and read the alpha and red channels as cutout masks,
//! so no color conversion happens at load time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during raster loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Raster {width}x{height} needs {expected} pixels, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Raster has no pixels: {0}")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image, 8 bits per channel, row-major with row 0 at the top.
#[derive(Clone, Debug)]
pub struct Raster {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Pixels as [R, G, B, A]
    pub pixels: Vec<[u8; 4]>,

    /// Source file path (for logging)
    pub path: String,
}

impl Raster {
    /// Build a raster from in-memory pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> TextureResult<Self> {
        Self::with_path(width, height, pixels, "<memory>")
    }

    fn with_path(
        width: u32,
        height: u32,
        pixels: Vec<[u8; 4]>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path));
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Decode an image file into RGBA8.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();

        Self::with_path(width, height, pixels, path.to_string_lossy())
    }

    /// Get the pixel at integer coordinates.
    ///
    /// Coordinates are clamped to the raster edge.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 4]>()
    }
}

/// Cache for loaded rasters.
///
/// Several textures may point at the same file; it is decoded once.
pub struct RasterCache {
    /// Cached rasters by the path they were requested with
    rasters: HashMap<String, Arc<Raster>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl RasterCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            rasters: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            rasters: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a raster from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Raster>> {
        if let Some(raster) = self.rasters.get(path) {
            return Ok(raster.clone());
        }

        let full_path = self.resolve_path(path);
        let raster = Arc::new(Raster::load(&full_path)?);

        self.rasters.insert(path.to_string(), raster.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            raster.width,
            raster.height,
            raster.size_bytes() as f32 / 1024.0
        );

        Ok(raster)
    }

    /// Insert an already decoded raster under `path`.
    pub fn insert(&mut self, path: impl Into<String>, raster: Raster) -> Arc<Raster> {
        let raster = Arc::new(raster);
        self.rasters.insert(path.into(), raster.clone());
        raster
    }

    /// Get the number of cached rasters.
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for RasterCache {
    fn default() -> Self {
        Self::new()
    }
}
