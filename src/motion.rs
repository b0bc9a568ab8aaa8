//! Decorative oscillators driving the bodies' positions and spins.

use nalgebra as na;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Wave::Sin => phase.sin(),
            Wave::Cos => phase.cos(),
        }
    }
}

/// A phase that grows by `speed` on every `advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    pub wave: Wave,
    pub phase: f32,
    pub speed: f32,
}

impl Oscillator {
    pub const DEFAULT_SPEED: f32 = 0.004;

    pub fn new(wave: Wave, speed: f32, start: f32) -> Self {
        Self {
            wave,
            phase: start,
            speed,
        }
    }

    pub fn sin(speed: f32) -> Self {
        Self::new(Wave::Sin, speed, 0.0)
    }

    pub fn cos(speed: f32) -> Self {
        Self::new(Wave::Cos, speed, 0.0)
    }

    /// Sample at the current phase, without advancing.
    pub fn sample(&self) -> f32 {
        self.wave.sample(self.phase)
    }

    /// Advances the phase, then samples at the new phase.
    pub fn advance(&mut self) -> f32 {
        self.phase += self.speed;
        self.sample()
    }
}

/// Per-axis oscillators scaled by `amplitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub amplitude: na::Vector3<f32>,
    pub axes: [Oscillator; 3],
}

impl Orbit {
    /// The common shape: `sin` on X and Y, `cos` on Z, all at one speed.
    pub fn elliptic(amplitude: na::Vector3<f32>, speed: f32) -> Self {
        Self {
            amplitude,
            axes: [
                Oscillator::sin(speed),
                Oscillator::sin(speed),
                Oscillator::cos(speed),
            ],
        }
    }

    pub fn with_start_x(mut self, start: f32) -> Self {
        self.axes[0].phase = start;
        self
    }

    /// Offset from the orbit's center after advancing every axis once.
    pub fn advance(&mut self) -> na::Vector3<f32> {
        na::Vector3::new(
            self.amplitude.x * self.axes[0].advance(),
            self.amplitude.y * self.axes[1].advance(),
            self.amplitude.z * self.axes[2].advance(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn advance_steps_before_sampling() {
        let mut oscillator = Oscillator::sin(0.5);

        assert_relative_eq!(oscillator.sample(), 0.0);
        assert_relative_eq!(oscillator.advance(), 0.5f32.sin());
        assert_relative_eq!(oscillator.advance(), 1.0f32.sin());
        assert_relative_eq!(oscillator.phase, 1.0);
    }

    #[test]
    fn oscillators_are_independent() {
        let mut a = Oscillator::cos(0.1);
        let mut b = a.clone();

        a.advance();
        a.advance();
        b.advance();

        assert_relative_eq!(a.phase, 0.2);
        assert_relative_eq!(b.phase, 0.1);
    }

    #[test]
    fn orbit_scales_each_axis() {
        let mut orbit = Orbit::elliptic(na::Vector3::new(-35.0, 20.0, -30.0), 0.004);

        let offset = orbit.advance();

        assert_relative_eq!(offset.x, -35.0 * 0.004f32.sin(), epsilon = 1e-6);
        assert_relative_eq!(offset.y, 20.0 * 0.004f32.sin(), epsilon = 1e-6);
        assert_relative_eq!(offset.z, -30.0 * 0.004f32.cos(), epsilon = 1e-6);
    }

    #[test]
    fn start_phase_shifts_only_x() {
        let mut orbit =
            Orbit::elliptic(na::Vector3::new(1.0, 1.0, 1.0), 0.004).with_start_x(90.0);

        let offset = orbit.advance();

        assert_relative_eq!(offset.x, 90.004f32.sin(), epsilon = 1e-5);
        assert_relative_eq!(offset.y, 0.004f32.sin(), epsilon = 1e-6);
    }
}
