//! Scene construction from a [`SceneDescription`].
//!
//! All assets are loaded here, before any rendering starts: a scene either
//! builds completely or not at all.

use std::sync::Arc;

use spt_core::{
    Mesh, MeshError, RasterCache, SceneDescription, SurfaceDesc, TextureDesc, TextureError,
};
use thiserror::Error;

use crate::{
    BitmapTexture, Col, Color, Plane, Polygon, PolygonSurface, Scene, Sphere, Surface, Texture,
    Vec3,
};

/// Errors raised while turning a description into a renderable scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("Invalid mesh for surface {index}: {source}")]
    Mesh {
        index: usize,
        #[source]
        source: MeshError,
    },
}

impl Scene {
    /// Build a scene, loading bitmaps relative to the description's
    /// base directory.
    pub fn build(desc: &SceneDescription) -> Result<Self, SceneError> {
        let mut cache = match &desc.base_dir {
            Some(dir) => RasterCache::with_base_dir(dir),
            None => RasterCache::new(),
        };
        Self::build_with_cache(desc, &mut cache)
    }

    /// Build a scene, sharing rasters through `cache`.
    pub fn build_with_cache(
        desc: &SceneDescription,
        cache: &mut RasterCache,
    ) -> Result<Self, SceneError> {
        let mut scene = Scene::default();

        for (index, surface) in desc.surfaces.iter().enumerate() {
            let texture = build_texture(surface.texture(), cache)?;

            let surface: Surface = match surface {
                SurfaceDesc::Sphere {
                    radius, position, ..
                } => Sphere::new(Vec3::from_array(*position), *radius, texture).into(),
                SurfaceDesc::Plane {
                    width,
                    height,
                    position,
                    ..
                } => Plane::new(Vec3::from_array(*position), *width, *height, texture).into(),
                SurfaceDesc::Polygon { vertices, .. } => Polygon::new(
                    Vec3::from_array(vertices[0]),
                    Vec3::from_array(vertices[1]),
                    Vec3::from_array(vertices[2]),
                    texture,
                )
                .into(),
                SurfaceDesc::Mesh {
                    radius,
                    position,
                    vertices,
                    faces,
                    ..
                } => {
                    let mesh = Mesh::from_coordinates(vertices, faces.clone())
                        .map_err(|source| SceneError::Mesh { index, source })?;
                    PolygonSurface::new(&mesh, *radius, Vec3::from_array(*position), texture).into()
                }
            };
            scene.push(surface);
        }

        log::info!(
            "Built scene: {} surfaces, {} primitives, {} rasters",
            scene.len(),
            scene.primitive_count(),
            cache.len()
        );

        Ok(scene)
    }
}

fn build_texture(desc: &TextureDesc, cache: &mut RasterCache) -> Result<Arc<Texture>, SceneError> {
    let texture = match desc {
        TextureDesc::Solid {
            emission,
            color,
            reflection,
        } => Texture::Solid(Col::new(
            Color::from_array(*emission),
            Color::from_array(*color),
            *reflection,
        )),
        TextureDesc::Checker {
            color_a,
            color_b,
            frequency,
        } => Texture::Checker {
            a: Col::diffuse(Color::from_array(*color_a)),
            b: Col::diffuse(Color::from_array(*color_b)),
            frequency: *frequency,
        },
        TextureDesc::Bitmap {
            path,
            offset,
            enhance,
        } => Texture::Bitmap(BitmapTexture::new(cache.load(path)?, *offset, *enhance)),
        TextureDesc::Emission {
            path,
            emission,
            threshold,
        } => Texture::Emission {
            bitmap: BitmapTexture::new(cache.load(path)?, 0.0, 1.0),
            emission: Color::from_array(*emission),
            threshold: *threshold,
        },
    };
    Ok(Arc::new(texture))
}
