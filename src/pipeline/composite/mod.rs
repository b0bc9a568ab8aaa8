pub mod shaders;

use log::info;

use glium::uniform;

use crate::config::Config;
use crate::frame::FrameSize;
use crate::pipeline::bloom::{self, Bloom};
use crate::{CreationError, DrawError, ScreenQuad};

/// Holds the base buffer and writes `base + bloom` to the visible surface.
pub struct Composite {
    base_texture: glium::texture::Texture2d,
    depth_texture: glium::texture::DepthTexture2d,

    program: glium::Program,
}

impl Composite {
    pub fn create<F: glium::backend::Facade>(
        facade: &F,
        config: &Config,
        size: FrameSize,
    ) -> Result<Self, CreationError> {
        let mut core = bloom::shaders::composition_transform(shaders::base_core());
        core = shaders::tone_mapping_transform(core, &config.tone_mapping);
        if let Some(gamma) = config.gamma_correction {
            core = shaders::gamma_correction_transform(core, gamma);
        }

        info!("Creating composition program");
        let program = core.build_program(facade)?;

        Ok(Composite {
            base_texture: bloom::create_color_texture(facade, size)?,
            depth_texture: bloom::create_depth_texture(facade, size)?,
            program,
        })
    }

    /// Framebuffer the true-material scene is rendered into.
    pub fn base_target<'a, F: glium::backend::Facade>(
        &'a self,
        facade: &F,
    ) -> Result<glium::framebuffer::SimpleFrameBuffer<'a>, DrawError> {
        Ok(glium::framebuffer::SimpleFrameBuffer::with_depth_buffer(
            facade,
            &self.base_texture,
            &self.depth_texture,
        )?)
    }

    pub fn compose<S: glium::Surface>(
        &self,
        bloom: &Bloom,
        screen_quad: &ScreenQuad,
        target: &mut S,
    ) -> Result<(), DrawError> {
        screen_quad.draw(
            target,
            &self.program,
            &uniform! {
                base_texture: bloom::clamped(&self.base_texture),
                bloom_texture: bloom::clamped(bloom.output()),
            },
        )?;

        Ok(())
    }

    pub fn on_target_resize<F: glium::backend::Facade>(
        &mut self,
        facade: &F,
        size: FrameSize,
    ) -> Result<(), CreationError> {
        self.base_texture = bloom::create_color_texture(facade, size)?;
        self.depth_texture = bloom::create_depth_texture(facade, size)?;

        Ok(())
    }
}
