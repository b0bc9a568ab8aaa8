use log::{info, warn};
use nalgebra as na;

use crate::scene::{GeometryId, Scene, TextureId, TextureSource};
use crate::{CreationError, Mesh};

/// GPU copies of a scene's geometries and textures, indexed by their ids.
pub struct Resources {
    meshes: Vec<Mesh>,
    textures: Vec<glium::texture::SrgbTexture2d>,

    /// Bound for materials without a map.
    white: glium::texture::SrgbTexture2d,
}

impl Resources {
    pub fn create<F: glium::backend::Facade>(
        facade: &F,
        scene: &Scene,
    ) -> Result<Resources, CreationError> {
        info!("Creating {} meshes", scene.geometries().len());
        let meshes = scene
            .geometries()
            .iter()
            .map(|geometry| Mesh::create(facade, &geometry.tessellate()))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Uploading {} textures", scene.textures().len());
        let textures = scene
            .textures()
            .iter()
            .map(|source| upload(facade, load_image(source)))
            .collect::<Result<Vec<_>, _>>()?;

        let white = upload(facade, solid_image(na::Vector3::new(1.0, 1.0, 1.0)))?;

        Ok(Resources {
            meshes,
            textures,
            white,
        })
    }

    pub fn mesh(&self, id: GeometryId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn texture(&self, id: Option<TextureId>) -> &glium::texture::SrgbTexture2d {
        match id {
            Some(id) => &self.textures[id.0],
            None => &self.white,
        }
    }
}

/// Decodes the image at `source.path`, or a single texel of the fallback
/// color if it cannot be read.
pub fn load_image(source: &TextureSource) -> image::RgbaImage {
    match image::open(&source.path) {
        Ok(image) => {
            info!("Loaded texture {}", source.path.display());
            image.to_rgba8()
        }
        Err(err) => {
            warn!(
                "Using fallback color for texture {}: {}",
                source.path.display(),
                err
            );
            solid_image(source.fallback)
        }
    }
}

/// 1x1 image of an sRGB color given in [0, 1].
pub fn solid_image(color: na::Vector3<f32>) -> image::RgbaImage {
    let channel = |c: f32| (c.max(0.0).min(1.0) * 255.0).round() as u8;

    image::RgbaImage::from_pixel(
        1,
        1,
        image::Rgba([channel(color.x), channel(color.y), channel(color.z), 255]),
    )
}

fn upload<F: glium::backend::Facade>(
    facade: &F,
    image: image::RgbaImage,
) -> Result<glium::texture::SrgbTexture2d, CreationError> {
    let dimensions = image.dimensions();
    let raw = glium::texture::RawImage2d::from_raw_rgba_reversed(&image.into_raw(), dimensions);

    Ok(glium::texture::SrgbTexture2d::new(facade, raw)?)
}
