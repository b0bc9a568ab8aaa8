//! Per-frame sequencing of the selective bloom passes.

use coarse_prof::profile;
use log::{info, warn};

use crate::scene::Scene;
use crate::selective::BloomSelection;
use crate::Context;

/// Pixel dimensions of the render targets. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Raises zero dimensions to 1.
    pub fn clamped(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            warn!("Clamping degenerate frame size {}x{}", width, height);
        }

        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<(u32, u32)> for FrameSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::clamped(width, height)
    }
}

/// A backend able to draw the two passes of a frame.
pub trait FrameRenderer {
    type Target;
    type Error;

    /// Renders the scene offscreen and blurs its bright parts into the bloom
    /// buffer. Non-bloom objects arrive wearing the flat material.
    fn bloom_pass(&mut self, context: &Context, scene: &Scene) -> Result<(), Self::Error>;

    /// Renders the scene with its true materials and writes
    /// `base + bloom` to `target`.
    fn composite_pass(
        &mut self,
        context: &Context,
        scene: &Scene,
        target: &mut Self::Target,
    ) -> Result<(), Self::Error>;

    /// Reallocates every size-dependent buffer.
    fn resize(&mut self, size: FrameSize) -> Result<(), Self::Error>;
}

/// Cosmetic per-frame updates of positions and rotations.
pub trait Animate {
    fn animate(&mut self, scene: &mut Scene, context: &mut Context);
}

/// No motion at all.
impl Animate for () {
    fn animate(&mut self, _: &mut Scene, _: &mut Context) {}
}

pub struct FrameDriver<A> {
    scene: Scene,
    selection: BloomSelection,
    context: Context,
    animation: A,
    size: FrameSize,
}

impl<A: Animate> FrameDriver<A> {
    /// Takes ownership of the finished scene and classifies it.
    pub fn new(mut scene: Scene, mut context: Context, animation: A, size: FrameSize) -> Self {
        let selection = BloomSelection::new(&mut scene);
        context.camera.set_viewport(size.width(), size.height());

        info!(
            "Frame driver ready with {} objects at {}x{}",
            scene.objects().len(),
            size.width(),
            size.height(),
        );

        Self {
            scene,
            selection,
            context,
            animation,
            size,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &BloomSelection {
        &self.selection
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Animate, darken, bloom, restore, composite.
    ///
    /// Materials are restored even if the bloom pass fails.
    pub fn draw_frame<R: FrameRenderer>(
        &mut self,
        renderer: &mut R,
        target: &mut R::Target,
    ) -> Result<(), R::Error> {
        profile!("frame");

        {
            profile!("animate");
            self.animation.animate(&mut self.scene, &mut self.context);
        }

        {
            profile!("bloom_pass");

            let darkened = self.selection.darken(&mut self.scene);
            renderer.bloom_pass(&self.context, &darkened)?;
        }

        profile!("composite_pass");
        renderer.composite_pass(&self.context, &self.scene, target)
    }

    /// Clamps the new size, updates the camera's aspect ratio and resizes
    /// the renderer's buffers.
    pub fn resize<R: FrameRenderer>(
        &mut self,
        renderer: &mut R,
        width: u32,
        height: u32,
    ) -> Result<(), R::Error> {
        let size = FrameSize::clamped(width, height);

        self.size = size;
        self.context.camera.set_viewport(size.width(), size.height());

        renderer.resize(size)
    }
}
