//! A CPU renderer implementing the same frame as `Pipeline`.
//!
//! It needs no GL context, which makes it suitable for headless tests and
//! as a reference for what the shaders are supposed to compute.

pub mod post;
pub mod raster;

use std::convert::Infallible;

use coarse_prof::profile;
use log::info;

use crate::config::Config;
use crate::frame::{FrameRenderer, FrameSize};
use crate::scene::Scene;
use crate::Context;

pub use post::Image;
pub use raster::Textures;

/// Every buffer is allocated in `new` and `resize` and overwritten in place
/// by each frame.
pub struct SoftwareRenderer {
    config: Config,
    textures: Textures,
    size: FrameSize,

    /// The darkened scene of the bloom pass.
    darkened: Image,
    scratch: Image,
    bloom: Image,
    base: Image,
    depth: Vec<f32>,
}

fn blank(size: FrameSize) -> Image {
    Image::new(size.width(), size.height())
}

impl SoftwareRenderer {
    pub fn new(config: &Config, scene: &Scene, size: FrameSize) -> Self {
        info!(
            "Creating software renderer at {}x{}",
            size.width(),
            size.height()
        );

        Self {
            config: config.clone(),
            textures: Textures::decode(scene),
            size,
            darkened: blank(size),
            scratch: blank(size),
            bloom: blank(size),
            base: blank(size),
            depth: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Result of the latest bloom pass. Reused across frames.
    pub fn bloom_output(&self) -> &Image {
        &self.bloom
    }

    /// The true-material scene of the latest composite pass.
    pub fn base_output(&self) -> &Image {
        &self.base
    }

    /// An image of the current size to composite into.
    pub fn create_target(&self) -> Image {
        blank(self.size)
    }
}

impl FrameRenderer for SoftwareRenderer {
    type Target = Image;
    type Error = Infallible;

    fn bloom_pass(&mut self, context: &Context, scene: &Scene) -> Result<(), Infallible> {
        {
            profile!("scene_pass");
            raster::render_into(
                scene,
                context,
                &self.textures,
                false,
                &mut self.darkened,
                &mut self.depth,
            );
        }

        profile!("blur");
        post::bloom_into(
            &self.darkened,
            &self.config.bloom,
            &mut self.bloom,
            &mut self.scratch,
        );

        Ok(())
    }

    /// `target` is reallocated only if its size differs from the frame.
    fn composite_pass(
        &mut self,
        context: &Context,
        scene: &Scene,
        target: &mut Image,
    ) -> Result<(), Infallible> {
        {
            profile!("scene_pass");
            raster::render_into(
                scene,
                context,
                &self.textures,
                true,
                &mut self.base,
                &mut self.depth,
            );
        }

        profile!("compose");
        post::composite_into(&self.base, &self.bloom, &self.config, target);

        Ok(())
    }

    fn resize(&mut self, size: FrameSize) -> Result<(), Infallible> {
        self.size = size;
        self.darkened = blank(size);
        self.scratch = blank(size);
        self.bloom = blank(size);
        self.base = blank(size);

        Ok(())
    }
}
