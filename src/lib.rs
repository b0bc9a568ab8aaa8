pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod frame;
pub mod layers;
pub mod mesh;
pub mod motion;
pub mod pipeline;
pub mod resources;
pub mod scene;
pub mod screen_quad;
pub mod selective;
pub mod shader;
pub mod software;
pub mod solar_system;
pub mod tone_mapping;

use nalgebra as na;

pub use camera::Camera;
pub use config::{BloomConfig, Config};
pub use error::{CreationError, DrawError};
pub use frame::{Animate, FrameDriver, FrameRenderer, FrameSize};
pub use layers::Layers;
pub use mesh::Mesh;
pub use pipeline::Pipeline;
pub use resources::Resources;
pub use scene::{Scene, SceneBuilder};
pub use screen_quad::ScreenQuad;
pub use selective::BloomSelection;
pub use software::SoftwareRenderer;

/// Number of lights the scene shaders evaluate. Further lights in a
/// `Context` are ignored.
pub const MAX_LIGHTS: usize = 4;

/// A white-by-default point light.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: na::Point3<f32>,
    pub color: na::Vector3<f32>,

    /// Distance at which the light fades out completely. `None` reaches
    /// everywhere with full strength.
    pub range: Option<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: na::Point3::origin(),
            color: na::Vector3::new(1.0, 1.0, 1.0),
            range: None,
        }
    }
}

impl Light {
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = Some(range);
        self
    }

    /// Smooth window `saturate(1 - (d / range)^4)^2`, which is 1 at the light
    /// and reaches 0 at `range`.
    pub fn falloff(&self, distance: f32) -> f32 {
        match self.range {
            Some(range) if range > 0.0 => {
                let window = (1.0 - (distance / range).powi(4)).max(0.0).min(1.0);
                window * window
            }
            _ => 1.0,
        }
    }
}

/// Per-frame state that is not part of the scene objects themselves.
#[derive(Debug, Clone)]
pub struct Context {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub ambient_light: na::Vector3<f32>,
}

impl Context {
    /// The lights that take part in shading.
    pub fn active_lights(&self) -> &[Light] {
        &self.lights[..self.lights.len().min(MAX_LIGHTS)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn unbounded_light_does_not_fade() {
        let light = Light::default();

        assert_eq!(light.falloff(0.0), 1.0);
        assert_eq!(light.falloff(1e4), 1.0);
    }

    #[test]
    fn ranged_light_fades_out_at_its_range() {
        let light = Light::default().with_range(3.0);

        assert_eq!(light.falloff(0.0), 1.0);
        assert_relative_eq!(light.falloff(1.5), 0.9375 * 0.9375);
        assert_eq!(light.falloff(3.0), 0.0);
        assert_eq!(light.falloff(4.0), 0.0);
    }

    #[test]
    fn only_the_first_lights_are_active() {
        let context = Context {
            camera: Camera::new(75.0, 1.0, 0.1, 100.0),
            lights: vec![Light::default(); MAX_LIGHTS + 2],
            ambient_light: na::Vector3::zeros(),
        };

        assert_eq!(context.active_lights().len(), MAX_LIGHTS);
    }
}
