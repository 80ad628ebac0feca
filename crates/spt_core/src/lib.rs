//! SPT Core - scene data for the path tracer.
//!
//! This crate provides the renderer-agnostic inputs of a render:
//!
//! - **Rasters**: decoded RGBA8 bitmap assets and a path-keyed cache
//! - **Meshes**: quad-indexed vertex data and bounding-sphere fitting
//! - **Scene descriptions**: serde types for surfaces, textures and camera,
//!   loadable from JSON, plus the built-in default room
//!
//! # Example
//!
//! ```ignore
//! use spt_core::scene::load_scene;
//!
//! let desc = load_scene("scenes/showcase.json")?;
//! println!("Loaded {} surfaces", desc.surfaces.len());
//! ```

pub mod mesh;
pub mod raster;
pub mod scene;

pub use mesh::{Mesh, MeshError};
pub use raster::{Raster, RasterCache, TextureError, TextureResult};
pub use scene::{
    load_scene, CameraDesc, LoadError, LoadResult, ReflectionKind, SceneDescription, SurfaceDesc,
    TextureDesc,
};
