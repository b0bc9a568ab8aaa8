//! Selective bloom bookkeeping.
//!
//! Objects are split once into glowing and non-glowing sets. For the bloom
//! pass the non-glowing set is painted with a shared flat black material,
//! which hides their appearance but keeps them occluding glowing objects
//! behind them. Their true materials come back from the
//! `MaterialSwapCache` before anything else looks at the scene.

mod cache;
mod darken;

use log::debug;

use crate::scene::{Material, MaterialId, ObjectId, Renderable, Scene};

pub use cache::MaterialSwapCache;
pub use darken::Darkened;

/// Whether `object` takes part in the bloom pass with its own material.
/// Depends only on the layers assigned at construction.
pub fn is_bloom_member(object: &Renderable) -> bool {
    object.layers().is_bloom_member()
}

/// The two disjoint object sets, in scene order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub bloom: Vec<ObjectId>,
    pub non_bloom: Vec<ObjectId>,
}

impl Classification {
    pub fn classify(scene: &Scene) -> Self {
        let (bloom, non_bloom): (Vec<&Renderable>, Vec<&Renderable>) =
            scene.objects().iter().partition(|object| is_bloom_member(object));

        Self {
            bloom: bloom.iter().map(|object| object.id()).collect(),
            non_bloom: non_bloom.iter().map(|object| object.id()).collect(),
        }
    }
}

/// Everything the frame driver needs to darken and restore a scene.
#[derive(Debug, Clone)]
pub struct BloomSelection {
    classification: Classification,
    cache: MaterialSwapCache,
    flat_material: MaterialId,
}

impl BloomSelection {
    /// Classifies the finished scene, records the original materials and
    /// registers the shared flat material with the scene.
    ///
    /// Must be called exactly once, after the last object is added.
    pub fn new(scene: &mut Scene) -> Self {
        let classification = Classification::classify(scene);
        let cache = MaterialSwapCache::initialize(scene);
        let flat_material = scene.add_material(Material::flat_black());

        debug!(
            "Classified {} bloom and {} non-bloom objects",
            classification.bloom.len(),
            classification.non_bloom.len(),
        );

        Self {
            classification,
            cache,
            flat_material,
        }
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn cache(&self) -> &MaterialSwapCache {
        &self.cache
    }

    pub fn flat_material(&self) -> MaterialId {
        self.flat_material
    }

    /// Paints every non-bloom object with the flat material.
    ///
    /// Prefer `darken`, which pairs this with `restore_materials`.
    pub fn override_materials(&self, scene: &mut Scene) {
        for &id in self.classification.non_bloom.iter() {
            scene.assign_material(id, self.flat_material);
        }
    }

    /// Puts back the material each non-bloom object had when the cache was
    /// initialized.
    pub fn restore_materials(&self, scene: &mut Scene) {
        for &id in self.classification.non_bloom.iter() {
            scene.assign_material(id, self.cache.lookup(id));
        }
    }

    /// Overrides the non-bloom materials until the returned guard is dropped.
    pub fn darken<'a>(&'a self, scene: &'a mut Scene) -> Darkened<'a> {
        Darkened::new(scene, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra as na;

    use crate::layers::Layers;
    use crate::scene::{Geometry, ObjectDesc, SceneBuilder};

    fn mixed_scene() -> Scene {
        let mut builder = SceneBuilder::new();
        let sphere = builder.add_geometry(Geometry::sphere(1.0, 8, 6));
        let white = builder.add_material(Material::unlit(na::Vector3::new(1.0, 1.0, 1.0)));
        let blue = builder.add_material(Material::lit(na::Vector3::new(0.1, 0.2, 0.8)));
        let red = builder.add_material(Material::lit(na::Vector3::new(0.8, 0.2, 0.1)));

        builder.add_object(ObjectDesc::new("sun", sphere, white).with_layers(Layers::glowing()));
        builder.add_object(ObjectDesc::new("earth", sphere, blue));
        builder.add_object(ObjectDesc::new("moon", sphere, white).with_layers(Layers::glowing()));
        builder.add_object(ObjectDesc::new("mars", sphere, red));

        builder.build()
    }

    fn materials(scene: &Scene) -> Vec<MaterialId> {
        scene.objects().iter().map(|object| object.material()).collect()
    }

    #[test]
    fn classification_is_disjoint_and_complete() {
        let scene = mixed_scene();
        let classification = Classification::classify(&scene);

        let ids = |names: &[&str]| -> Vec<ObjectId> {
            names.iter().map(|name| scene.find(name).unwrap()).collect()
        };

        assert_eq!(classification.bloom, ids(&["sun", "moon"]));
        assert_eq!(classification.non_bloom, ids(&["earth", "mars"]));
    }

    #[test]
    fn classification_is_stable() {
        let scene = mixed_scene();

        let first: Vec<bool> = scene.objects().iter().map(is_bloom_member).collect();
        let second: Vec<bool> = scene.objects().iter().map(is_bloom_member).collect();

        assert_eq!(first, second);
        assert_eq!(Classification::classify(&scene), Classification::classify(&scene));
    }

    #[test]
    fn darken_paints_only_non_bloom_objects() {
        let mut scene = mixed_scene();
        let selection = BloomSelection::new(&mut scene);
        let before = materials(&scene);

        let darkened = selection.darken(&mut scene);
        let flat = selection.flat_material();

        for object in darkened.objects() {
            if is_bloom_member(object) {
                assert_eq!(object.material(), before[object.id().index()]);
            } else {
                assert_eq!(object.material(), flat);
            }
        }
        assert_eq!(darkened.material(flat), &Material::flat_black());
    }

    #[test]
    fn dropping_the_guard_restores_original_materials() {
        let mut scene = mixed_scene();
        let selection = BloomSelection::new(&mut scene);
        let before = materials(&scene);

        for _ in 0..3 {
            let darkened = selection.darken(&mut scene);
            assert_ne!(materials(&darkened), before);
            drop(darkened);

            assert_eq!(materials(&scene), before);
            assert!(scene
                .objects()
                .iter()
                .all(|object| object.material() != selection.flat_material()));
        }
    }

    #[test]
    fn explicit_override_and_restore_round_trip() {
        let mut scene = mixed_scene();
        let selection = BloomSelection::new(&mut scene);
        let before = materials(&scene);

        selection.override_materials(&mut scene);
        selection.override_materials(&mut scene);
        selection.restore_materials(&mut scene);

        assert_eq!(materials(&scene), before);
    }

    #[test]
    fn cache_covers_every_non_bloom_object() {
        let mut scene = mixed_scene();
        let selection = BloomSelection::new(&mut scene);

        for object in scene.objects() {
            assert_eq!(selection.cache().contains(object.id()), !is_bloom_member(object));
        }
    }
}
