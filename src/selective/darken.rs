use std::ops::Deref;

use crate::scene::Scene;
use crate::selective::BloomSelection;

/// A scene whose non-bloom objects currently wear the flat black material.
///
/// Dropping the guard restores every overridden object from the
/// `MaterialSwapCache`, so the override cannot outlive the bloom pass that
/// borrows it. Only shared access to the scene is handed out meanwhile.
pub struct Darkened<'a> {
    scene: &'a mut Scene,
    selection: &'a BloomSelection,
}

impl<'a> Darkened<'a> {
    pub(super) fn new(scene: &'a mut Scene, selection: &'a BloomSelection) -> Self {
        selection.override_materials(scene);

        Self { scene, selection }
    }
}

impl<'a> Deref for Darkened<'a> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        &*self.scene
    }
}

impl<'a> Drop for Darkened<'a> {
    fn drop(&mut self) {
        self.selection.restore_materials(&mut *self.scene);
    }
}
