use std::f32::consts::PI;

use nalgebra as na;

use glium::glutin::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::Camera;

#[derive(Debug, Clone)]
pub struct Config {
    pub rotate_radians_per_pixel: f32,

    /// Distance is multiplied by this for each wheel step towards the target.
    pub zoom_factor_per_step: f32,

    pub pixels_per_step: f32,

    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            rotate_radians_per_pixel: 0.005,
            zoom_factor_per_step: 0.95,
            pixels_per_step: 50.0,
            min_distance: 1.0,
            max_distance: 150.0,
        }
    }
}

/// Mouse orbiting around `camera.target`: drag with the left button to
/// rotate, scroll to zoom.
pub struct OrbitControls {
    config: Config,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl OrbitControls {
    pub fn new(config: Config) -> OrbitControls {
        OrbitControls {
            config,
            dragging: false,
            last_cursor: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32) {
        let offset = camera.eye - camera.target;
        let radius = offset.norm();

        if radius == 0.0 {
            return;
        }

        let theta = offset.x.atan2(offset.z) - dx * self.config.rotate_radians_per_pixel;
        let phi = ((offset.y / radius).max(-1.0).min(1.0).acos()
            - dy * self.config.rotate_radians_per_pixel)
            .max(1e-3)
            .min(PI - 1e-3);

        camera.eye = camera.target
            + na::Vector3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Positive `steps` move towards the target.
    pub fn zoom(&self, camera: &mut Camera, steps: f32) {
        let offset = camera.eye - camera.target;
        let distance = offset.norm();

        if distance == 0.0 {
            return;
        }

        let new_distance = (distance * self.config.zoom_factor_per_step.powf(steps))
            .max(self.config.min_distance)
            .min(self.config.max_distance);

        camera.eye = camera.target + offset * (new_distance / distance);
    }

    pub fn on_event(&mut self, event: &WindowEvent, camera: &mut Camera) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_cursor {
                    if self.dragging {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.rotate(camera, dx, dy);
                    }
                }

                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => {
                        position.y as f32 / self.config.pixels_per_step
                    }
                };

                self.zoom(camera, steps);
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(75.0, 1.0, 0.1, 1000.0)
            .looking_at(na::Point3::new(-15.0, 35.0, 60.0), na::Point3::origin())
    }

    #[test]
    fn rotation_keeps_distance_to_target() {
        let controls = OrbitControls::new(Config::default());
        let mut camera = camera();
        let distance = camera.distance();

        controls.rotate(&mut camera, 120.0, -40.0);

        assert_relative_eq!(camera.distance(), distance, epsilon = 1e-3);
        assert_ne!(camera.eye, self::camera().eye);
    }

    #[test]
    fn zoom_is_clamped() {
        let controls = OrbitControls::new(Config::default());
        let mut camera = camera();

        controls.zoom(&mut camera, 1000.0);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-4);

        controls.zoom(&mut camera, -1000.0);
        assert_relative_eq!(camera.distance(), 150.0, epsilon = 1e-3);
    }

    #[test]
    fn vertical_rotation_does_not_flip_over_the_pole() {
        let controls = OrbitControls::new(Config::default());
        let mut camera = camera();

        let distance = camera.distance();
        controls.rotate(&mut camera, 0.0, 10_000.0);

        let offset = camera.eye - camera.target;
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
        assert!(offset.y > 0.99 * distance);
    }
}
