use std::path::PathBuf;

use nalgebra as na;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Outputs `color * map` regardless of lights.
    Unlit,

    /// Lambert diffuse from the main light plus ambient.
    Lit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: na::Vector3<f32>,
    pub map: Option<TextureId>,
    pub shading: Shading,
    pub double_sided: bool,
}

impl Material {
    pub fn unlit(color: na::Vector3<f32>) -> Self {
        Self {
            color,
            map: None,
            shading: Shading::Unlit,
            double_sided: false,
        }
    }

    pub fn lit(color: na::Vector3<f32>) -> Self {
        Self {
            shading: Shading::Lit,
            ..Self::unlit(color)
        }
    }

    /// The shared material painted over non-glowing objects in the bloom
    /// pass. Black blurs to black, so these objects only occlude.
    pub fn flat_black() -> Self {
        Self::unlit(na::Vector3::zeros())
    }

    pub fn with_map(mut self, texture: TextureId) -> Self {
        self.map = Some(texture);
        self
    }

    pub fn with_double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// An image file to be uploaded as a color map. If the file cannot be
/// read, a single texel of `fallback` is used instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSource {
    pub path: PathBuf,
    pub fallback: na::Vector3<f32>,
}
