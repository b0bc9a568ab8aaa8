use std::collections::HashMap;

use crate::scene::{MaterialId, ObjectId, Scene};

/// Original materials of every non-bloom object, recorded once from the
/// initial scene state.
///
/// There is no way to add or remove entries after construction, so the
/// cache cannot drift from the classification it was built with.
#[derive(Debug, Clone)]
pub struct MaterialSwapCache {
    originals: HashMap<ObjectId, MaterialId>,
}

impl MaterialSwapCache {
    /// Must be called after every object has been added and before any
    /// material has been overridden.
    pub fn initialize(scene: &Scene) -> Self {
        let originals = scene
            .objects()
            .iter()
            .filter(|object| !object.layers().is_bloom_member())
            .map(|object| (object.id(), object.material()))
            .collect();

        Self { originals }
    }

    /// Panics if `id` was not cached, which means the object was classified
    /// as glowing or did not exist when the cache was initialized.
    pub fn lookup(&self, id: ObjectId) -> MaterialId {
        match self.originals.get(&id) {
            Some(material) => *material,
            None => panic!("no cached material for object {:?}", id),
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<MaterialId> {
        self.originals.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.originals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra as na;

    use crate::layers::Layers;
    use crate::scene::{Geometry, Material, ObjectDesc, SceneBuilder};

    #[test]
    fn caches_exactly_the_non_bloom_objects() {
        let mut builder = SceneBuilder::new();
        let sphere = builder.add_geometry(Geometry::sphere(1.0, 8, 6));
        let glow = builder.add_material(Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)));
        let rock = builder.add_material(Material::lit(na::Vector3::new(0.3, 0.3, 0.3)));
        let ice = builder.add_material(Material::lit(na::Vector3::new(0.6, 0.7, 0.9)));

        let star = builder.add_object(ObjectDesc::new("star", sphere, glow).with_layers(Layers::glowing()));
        let planet = builder.add_object(ObjectDesc::new("planet", sphere, rock));
        let moon = builder.add_object(ObjectDesc::new("moon", sphere, ice));
        let scene = builder.build();

        let cache = MaterialSwapCache::initialize(&scene);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(planet), rock);
        assert_eq!(cache.lookup(moon), ice);
        assert!(!cache.contains(star));
        assert_eq!(cache.get(star), None);
    }

    #[test]
    #[should_panic(expected = "no cached material")]
    fn lookup_of_bloom_object_panics() {
        let mut builder = SceneBuilder::new();
        let sphere = builder.add_geometry(Geometry::sphere(1.0, 8, 6));
        let glow = builder.add_material(Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)));
        let sun = builder.add_object(ObjectDesc::new("sun", sphere, glow).with_layers(Layers::glowing()));
        let scene = builder.build();

        MaterialSwapCache::initialize(&scene).lookup(sun);
    }
}
