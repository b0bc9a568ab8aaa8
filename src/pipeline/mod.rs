//! The glium implementation of the selective bloom frame.

pub mod bloom;
pub mod composite;
pub mod scene_pass;

use std::rc::Rc;

use coarse_prof::profile;
use log::info;

use crate::config::Config;
use crate::frame::{FrameRenderer, FrameSize};
use crate::scene::Scene;
use crate::{Context, CreationError, DrawError, Resources, ScreenQuad};

use bloom::Bloom;
use composite::Composite;
use scene_pass::ScenePass;

pub struct Pipeline {
    facade: Rc<glium::backend::Context>,
    config: Config,

    resources: Resources,
    screen_quad: ScreenQuad,

    scene_pass: ScenePass,
    bloom: Bloom,
    composite: Composite,

    size: FrameSize,
}

impl Pipeline {
    /// Uploads the scene's meshes and textures and builds every program.
    pub fn create<F: glium::backend::Facade>(
        facade: &F,
        config: &Config,
        scene: &Scene,
        size: FrameSize,
    ) -> Result<Pipeline, CreationError> {
        let resources = Resources::create(facade, scene)?;

        info!("Creating screen quad");
        let screen_quad = ScreenQuad::create(facade)?;

        let scene_pass = ScenePass::create(facade)?;
        let bloom = Bloom::create(facade, &config.bloom, size)?;
        let composite = Composite::create(facade, config, size)?;

        info!("Pipeline initialized at {}x{}", size.width(), size.height());

        Ok(Pipeline {
            facade: facade.get_context().clone(),
            config: config.clone(),
            resources,
            screen_quad,
            scene_pass,
            bloom,
            composite,
            size,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }
}

impl FrameRenderer for Pipeline {
    type Target = glium::Frame;
    type Error = DrawError;

    fn bloom_pass(&mut self, context: &Context, scene: &Scene) -> Result<(), DrawError> {
        {
            profile!("scene_pass");

            let mut target = self.bloom.scene_target(&self.facade)?;
            self.scene_pass.clear(
                &self.resources,
                scene,
                &self.screen_quad,
                false,
                &mut target,
            )?;
            self.scene_pass
                .draw(&self.resources, context, scene, &mut target)?;
        }

        self.bloom.blur_pass(&self.facade, &self.screen_quad)
    }

    fn composite_pass(
        &mut self,
        context: &Context,
        scene: &Scene,
        target: &mut glium::Frame,
    ) -> Result<(), DrawError> {
        {
            profile!("scene_pass");

            let mut base = self.composite.base_target(&self.facade)?;
            self.scene_pass.clear(
                &self.resources,
                scene,
                &self.screen_quad,
                true,
                &mut base,
            )?;
            self.scene_pass
                .draw(&self.resources, context, scene, &mut base)?;
        }

        profile!("compose");
        self.composite
            .compose(&self.bloom, &self.screen_quad, target)
    }

    fn resize(&mut self, size: FrameSize) -> Result<(), DrawError> {
        info!("Resizing render targets to {}x{}", size.width(), size.height());

        self.bloom.on_target_resize(&self.facade, size)?;
        self.composite.on_target_resize(&self.facade, size)?;
        self.size = size;

        Ok(())
    }
}
