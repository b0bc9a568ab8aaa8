//! Renderable objects and the arenas their geometry, materials and textures
//! live in.
//!
//! A `Scene` is assembled once through a `SceneBuilder`. Afterwards the set
//! of objects is fixed; only transforms (via `transform_mut`) and, for the
//! bloom override, material assignments may change.

pub mod geometry;
pub mod material;

use nalgebra as na;

use crate::layers::Layers;

pub use geometry::{Geometry, GeometryData, GeometryId};
pub use material::{Material, MaterialId, Shading, TextureId, TextureSource};

/// Stable identity of an object within its `Scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: na::Vector3<f32>,

    /// Euler angles in radians, applied in XYZ order.
    pub rotation: na::Vector3<f32>,

    pub scale: na::Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: na::Vector3::zeros(),
            rotation: na::Vector3::zeros(),
            scale: na::Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(position: na::Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn rotation_matrix(&self) -> na::Matrix4<f32> {
        na::Matrix4::from_axis_angle(&na::Vector3::x_axis(), self.rotation.x)
            * na::Matrix4::from_axis_angle(&na::Vector3::y_axis(), self.rotation.y)
            * na::Matrix4::from_axis_angle(&na::Vector3::z_axis(), self.rotation.z)
    }

    pub fn matrix(&self) -> na::Matrix4<f32> {
        na::Matrix4::new_translation(&self.position)
            * self.rotation_matrix()
            * na::Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(na::Vector3<f32>),
    Texture(TextureId),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(na::Vector3::zeros())
    }
}

/// Description of an object to be added to a `SceneBuilder`.
#[derive(Debug, Clone)]
pub struct ObjectDesc {
    pub name: String,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub layers: Layers,
    pub transform: Transform,
}

impl ObjectDesc {
    pub fn new(name: &str, geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            layers: Layers::default(),
            transform: Transform::default(),
        }
    }

    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Renderable {
    id: ObjectId,
    name: String,
    geometry: GeometryId,
    material: MaterialId,
    layers: Layers,

    pub transform: Transform,
}

impl Renderable {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> GeometryId {
        self.geometry
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn layers(&self) -> Layers {
        self.layers
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    objects: Vec<Renderable>,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    textures: Vec<TextureSource>,
    background: Background,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_texture(&mut self, texture: TextureSource) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn transform_mut(&mut self, id: ObjectId) -> &mut Transform {
        &mut self.objects[id.0].transform
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn add_object(&mut self, desc: ObjectDesc) -> ObjectId {
        assert!(
            desc.geometry.0 < self.geometries.len(),
            "object {} refers to unknown geometry",
            desc.name
        );
        assert!(
            desc.material.0 < self.materials.len(),
            "object {} refers to unknown material",
            desc.name
        );

        let id = ObjectId(self.objects.len());
        self.objects.push(Renderable {
            id,
            name: desc.name,
            geometry: desc.geometry,
            material: desc.material,
            layers: desc.layers,
            transform: desc.transform,
        });

        id
    }

    pub fn build(self) -> Scene {
        Scene {
            objects: self.objects,
            geometries: self.geometries,
            materials: self.materials,
            textures: self.textures,
            background: self.background,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<Renderable>,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    textures: Vec<TextureSource>,
    background: Background,
}

impl Scene {
    /// Objects in insertion order.
    pub fn objects(&self) -> &[Renderable] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> &Renderable {
        &self.objects[id.0]
    }

    pub fn transform_mut(&mut self, id: ObjectId) -> &mut Transform {
        &mut self.objects[id.0].transform
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|object| object.name == name)
            .map(|object| object.id)
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Registers a material after the scene has been built. Materials are
    /// never removed, so existing ids stay valid.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn textures(&self) -> &[TextureSource] {
        &self.textures
    }

    pub fn texture(&self, id: TextureId) -> &TextureSource {
        &self.textures[id.0]
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub(crate) fn assign_material(&mut self, id: ObjectId, material: MaterialId) {
        assert!(material.0 < self.materials.len(), "unknown material");
        self.objects[id.0].material = material;
    }
}
