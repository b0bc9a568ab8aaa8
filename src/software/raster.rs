//! Sphere impostor rasterization.
//!
//! Every object is drawn as a view-facing disc shaded like a sphere of the
//! object's bounding radius, with a per-pixel depth test. This is enough to
//! reproduce occlusion, lighting and color maps of the solar system bodies
//! on the CPU.

use std::f32::consts::PI;

use nalgebra as na;

use crate::scene::{Background, Material, Scene, Shading, TextureId};
use crate::Context;

use super::post::Image;

/// Decoded color maps in linear space, indexed by `TextureId`.
pub struct Textures {
    images: Vec<Image>,
}

impl Textures {
    pub fn decode(scene: &Scene) -> Self {
        let images = scene
            .textures()
            .iter()
            .map(|source| to_linear(&crate::resources::load_image(source)))
            .collect();

        Self { images }
    }

    /// Nearest texel at `uv`, with `v = 1` at the top row of the image.
    pub fn sample(&self, id: Option<TextureId>, uv: [f32; 2]) -> [f32; 3] {
        let image = match id {
            Some(id) => &self.images[id.0],
            None => return [1.0; 3],
        };

        let u = uv[0] - uv[0].floor();
        let v = uv[1].max(0.0).min(1.0);
        let x = ((u * image.width() as f32) as u32).min(image.width() - 1);
        let y = (((1.0 - v) * image.height() as f32) as u32).min(image.height() - 1);

        image.get_pixel(x, y).0
    }
}

fn to_linear(image: &image::RgbaImage) -> Image {
    Image::from_fn(image.width(), image.height(), |x, y| {
        let image::Rgba(texel) = *image.get_pixel(x, y);
        let decode = |c: u8| (c as f32 / 255.0).powf(2.2);

        image::Rgb([decode(texel[0]), decode(texel[1]), decode(texel[2])])
    })
}

/// Color a sphere map assigns to the object-space direction `normal`,
/// matching the UV layout of the tessellated spheres.
fn sphere_uv(normal: &na::Vector3<f32>) -> [f32; 2] {
    let u = normal.z.atan2(-normal.x) / (2.0 * PI);
    let v = 1.0 - normal.y.max(-1.0).min(1.0).acos() / PI;

    [u - u.floor(), v]
}

fn shade(
    material: &Material,
    textures: &Textures,
    context: &Context,
    surface: &na::Point3<f32>,
    world_normal: &na::Vector3<f32>,
    object_normal: &na::Vector3<f32>,
) -> [f32; 3] {
    let texel = textures.sample(material.map, sphere_uv(object_normal));
    let albedo = na::Vector3::new(
        material.color.x * texel[0],
        material.color.y * texel[1],
        material.color.z * texel[2],
    );

    let color = match material.shading {
        Shading::Unlit => albedo,
        Shading::Lit => {
            let mut lighting = context.ambient_light;

            for light in context.active_lights() {
                let to_light = light.position - surface;
                let diffuse = world_normal.dot(&to_light.normalize()).max(0.0);

                lighting += light.color * (diffuse * light.falloff(to_light.norm()));
            }

            albedo.component_mul(&lighting)
        }
    };

    [color.x, color.y, color.z]
}

fn fill_background(scene: &Scene, textures: &Textures, color: &mut Image) {
    let (width, height) = color.dimensions();

    match scene.background() {
        Background::Color(background) => {
            let background = image::Rgb([background.x, background.y, background.z]);
            for pixel in color.pixels_mut() {
                *pixel = background;
            }
        }
        Background::Texture(texture) => {
            for (x, y, pixel) in color.enumerate_pixels_mut() {
                let uv = [
                    (x as f32 + 0.5) / width as f32,
                    1.0 - (y as f32 + 0.5) / height as f32,
                ];
                *pixel = image::Rgb(textures.sample(Some(*texture), uv));
            }
        }
    }
}

/// Renders every object with its currently assigned material into `color`,
/// overwriting all of it. Without `with_background` the image starts out
/// black. `depth` is scratch space and keeps its allocation between calls.
pub fn render_into(
    scene: &Scene,
    context: &Context,
    textures: &Textures,
    with_background: bool,
    color: &mut Image,
    depth: &mut Vec<f32>,
) {
    let (width, height) = color.dimensions();

    if with_background {
        fill_background(scene, textures, color);
    } else {
        for pixel in color.pixels_mut() {
            *pixel = image::Rgb([0.0; 3]);
        }
    }

    depth.clear();
    depth.resize(width as usize * height as usize, std::f32::INFINITY);

    let view = context.camera.view();
    let projection = context.camera.projection();
    let view_rotation = view.fixed_slice::<na::U3, na::U3>(0, 0).into_owned();
    let camera_to_world = view_rotation.transpose();

    for object in scene.objects() {
        let transform = &object.transform;
        let radius = scene.geometry(object.geometry()).bounding_radius()
            * transform.scale.amax();

        let center = na::Point3::origin() + transform.position;
        let view_center = view * center.to_homogeneous();
        let distance = -view_center.z;

        if distance <= context.camera.near + radius || distance - radius >= context.camera.far {
            continue;
        }

        let clip = projection * view_center;
        let cx = (clip.x / clip.w + 1.0) * 0.5 * width as f32;
        let cy = (1.0 - clip.y / clip.w) * 0.5 * height as f32;
        let pixel_radius = radius * projection[(1, 1)] / distance * 0.5 * height as f32;

        if pixel_radius <= 0.0 {
            continue;
        }

        let min_x = (cx - pixel_radius).floor().max(0.0) as u32;
        let max_x = (cx + pixel_radius).ceil().min(width as f32) as u32;
        let min_y = (cy - pixel_radius).floor().max(0.0) as u32;
        let max_y = (cy + pixel_radius).ceil().min(height as f32) as u32;

        let material = scene.material(object.material());
        let object_rotation = transform.rotation_matrix();
        let world_to_object = object_rotation
            .fixed_slice::<na::U3, na::U3>(0, 0)
            .transpose();

        for y in min_y..max_y {
            for x in min_x..max_x {
                let u = (x as f32 + 0.5 - cx) / pixel_radius;
                let v = (cy - (y as f32 + 0.5)) / pixel_radius;
                let d2 = u * u + v * v;

                if d2 > 1.0 {
                    continue;
                }

                let w = (1.0 - d2).sqrt();
                let fragment_depth = distance - radius * w;
                let index = y as usize * width as usize + x as usize;

                if fragment_depth >= depth[index] {
                    continue;
                }
                depth[index] = fragment_depth;

                let world_normal = camera_to_world * na::Vector3::new(u, v, w);
                let object_normal = world_to_object * world_normal;
                let surface = center + world_normal * radius;

                let shaded = shade(
                    material,
                    textures,
                    context,
                    &surface,
                    &world_normal,
                    &object_normal,
                );
                color.put_pixel(x, y, image::Rgb(shaded));
            }
        }
    }
}
