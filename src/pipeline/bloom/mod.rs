pub mod shaders;

use coarse_prof::profile;
use log::info;

use glium::uniforms::{MagnifySamplerFilter, Sampler, SamplerWrapFunction};
use glium::{uniform, Surface};

use crate::config::BloomConfig;
use crate::frame::FrameSize;
use crate::{CreationError, DrawError, ScreenQuad};

/// Offscreen scene target plus the ping-pong buffers of the blur.
///
/// The result lives in `output()`, which is overwritten by every call to
/// `blur_pass`. It is only recreated on resize.
pub struct Bloom {
    config: BloomConfig,

    scene_texture: glium::texture::Texture2d,
    depth_texture: glium::texture::DepthTexture2d,

    ping_texture: glium::texture::Texture2d,
    pong_texture: glium::texture::Texture2d,

    extract_program: glium::Program,
    blur_program: glium::Program,
}

impl Bloom {
    pub fn create<F: glium::backend::Facade>(
        facade: &F,
        config: &BloomConfig,
        size: FrameSize,
    ) -> Result<Self, CreationError> {
        info!("Creating bloom extract program");
        let extract_program = shaders::extract_core().build_program(facade)?;

        info!("Creating bloom blur program");
        let blur_program = shaders::blur_core().build_program(facade)?;

        Ok(Bloom {
            config: config.clone(),
            scene_texture: create_color_texture(facade, size)?,
            depth_texture: create_depth_texture(facade, size)?,
            ping_texture: create_color_texture(facade, size)?,
            pong_texture: create_color_texture(facade, size)?,
            extract_program,
            blur_program,
        })
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    /// Framebuffer the darkened scene is rendered into.
    pub fn scene_target<'a, F: glium::backend::Facade>(
        &'a self,
        facade: &F,
    ) -> Result<glium::framebuffer::SimpleFrameBuffer<'a>, DrawError> {
        Ok(glium::framebuffer::SimpleFrameBuffer::with_depth_buffer(
            facade,
            &self.scene_texture,
            &self.depth_texture,
        )?)
    }

    pub fn output(&self) -> &glium::texture::Texture2d {
        &self.ping_texture
    }

    /// Thresholds the scene texture, then blurs it back and forth between
    /// the ping and pong textures. Ends in the ping texture.
    pub fn blur_pass<F: glium::backend::Facade>(
        &self,
        facade: &F,
        screen_quad: &ScreenQuad,
    ) -> Result<(), DrawError> {
        {
            profile!("extract");

            let mut target = glium::framebuffer::SimpleFrameBuffer::new(facade, &self.ping_texture)?;
            screen_quad.draw(
                &mut target,
                &self.extract_program,
                &uniform! {
                    scene_texture: clamped(&self.scene_texture),
                    threshold: self.config.threshold,
                },
            )?;
        }

        profile!("blur");

        let iterations = self.config.iterations.max(1);

        for i in 0..iterations {
            let scale = if i + 1 == iterations {
                self.config.intensity
            } else {
                1.0
            };

            let mut pong = glium::framebuffer::SimpleFrameBuffer::new(facade, &self.pong_texture)?;
            screen_quad.draw(
                &mut pong,
                &self.blur_program,
                &uniform! {
                    input_texture: clamped(&self.ping_texture),
                    horizontal: true,
                    radius: self.config.radius,
                    scale: 1.0f32,
                },
            )?;

            let mut ping = glium::framebuffer::SimpleFrameBuffer::new(facade, &self.ping_texture)?;
            screen_quad.draw(
                &mut ping,
                &self.blur_program,
                &uniform! {
                    input_texture: clamped(&self.pong_texture),
                    horizontal: false,
                    radius: self.config.radius,
                    scale: scale,
                },
            )?;
        }

        Ok(())
    }

    pub fn on_target_resize<F: glium::backend::Facade>(
        &mut self,
        facade: &F,
        size: FrameSize,
    ) -> Result<(), CreationError> {
        self.scene_texture = create_color_texture(facade, size)?;
        self.depth_texture = create_depth_texture(facade, size)?;
        self.ping_texture = create_color_texture(facade, size)?;
        self.pong_texture = create_color_texture(facade, size)?;

        Ok(())
    }
}

pub(crate) fn clamped(texture: &glium::texture::Texture2d) -> Sampler<glium::texture::Texture2d> {
    Sampler::new(texture)
        .wrap_function(SamplerWrapFunction::Clamp)
        .magnify_filter(MagnifySamplerFilter::Linear)
}

pub(crate) fn create_color_texture<F: glium::backend::Facade>(
    facade: &F,
    size: FrameSize,
) -> Result<glium::texture::Texture2d, CreationError> {
    Ok(glium::texture::Texture2d::empty_with_format(
        facade,
        glium::texture::UncompressedFloatFormat::F16F16F16F16,
        glium::texture::MipmapsOption::NoMipmap,
        size.width(),
        size.height(),
    )?)
}

pub(crate) fn create_depth_texture<F: glium::backend::Facade>(
    facade: &F,
    size: FrameSize,
) -> Result<glium::texture::DepthTexture2d, CreationError> {
    Ok(glium::texture::DepthTexture2d::empty_with_format(
        facade,
        glium::texture::DepthFormat::F32,
        glium::texture::MipmapsOption::NoMipmap,
        size.width(),
        size.height(),
    )?)
}
