//! Material samples produced at surface hits.

use spt_math::Vec3;

pub use spt_core::ReflectionKind;

/// Linear RGB color.
pub type Color = Vec3;

/// What a texture reports for one surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Col {
    /// Light emitted by the surface
    pub emission: Color,
    /// Reflectance, also the Russian-roulette survival weight
    pub color: Color,
    pub reflection: ReflectionKind,
}

impl Col {
    pub fn new(emission: Color, color: Color, reflection: ReflectionKind) -> Self {
        Self {
            emission,
            color,
            reflection,
        }
    }

    /// Non-emissive diffuse sample.
    pub fn diffuse(color: Color) -> Self {
        Self::new(Color::ZERO, color, ReflectionKind::Diffuse)
    }
}
