//! Mapping of the composited HDR color into displayable range.
//!
//! The same curves exist as GLSL expressions for the composition shader and
//! as plain functions for the software renderer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    None,
    Linear,
    Reinhard,

    /// Optimized Cineon curve by Jim Hejl and Richard Burgess-Dawson. The
    /// curve has gamma baked in, which is undone so that the output stays
    /// linear.
    Cineon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToneMapping {
    pub mode: Mode,
    pub exposure: f32,
}

impl Default for ToneMapping {
    fn default() -> Self {
        Self {
            mode: Mode::Cineon,
            exposure: 1.5,
        }
    }
}

impl ToneMapping {
    pub fn none() -> Self {
        Self {
            mode: Mode::None,
            exposure: 1.0,
        }
    }

    pub fn apply(&self, color: [f32; 3]) -> [f32; 3] {
        let exposed = [
            color[0] * self.exposure,
            color[1] * self.exposure,
            color[2] * self.exposure,
        ];

        match self.mode {
            Mode::None => color,
            Mode::Linear => map(exposed, saturate),
            Mode::Reinhard => map(exposed, |c| saturate(c / (1.0 + c))),
            Mode::Cineon => map(exposed, |c| {
                let c = (c - 0.004).max(0.0);
                ((c * (6.2 * c + 0.5)) / (c * (6.2 * c + 1.7) + 0.06)).powf(2.2)
            }),
        }
    }

    /// GLSL expression of type `vec3` mapping the `vec3` expression `color`.
    pub fn glsl(&self, color: &str) -> String {
        let exposed = format!("({} * {:?})", color, self.exposure);

        match self.mode {
            Mode::None => color.to_string(),
            Mode::Linear => format!("clamp({}, 0.0, 1.0)", exposed),
            Mode::Reinhard => format!(
                "clamp({e} / (vec3(1.0) + {e}), 0.0, 1.0)",
                e = exposed
            ),
            Mode::Cineon => format!(
                "pow((max(vec3(0.0), {e} - 0.004) * (6.2 * max(vec3(0.0), {e} - 0.004) + 0.5)) \
                 / (max(vec3(0.0), {e} - 0.004) * (6.2 * max(vec3(0.0), {e} - 0.004) + 1.7) + 0.06), \
                 vec3(2.2))",
                e = exposed
            ),
        }
    }
}

pub fn gamma_correct(color: [f32; 3], gamma: f32) -> [f32; 3] {
    map(color, |c| c.max(0.0).powf(1.0 / gamma))
}

fn saturate(c: f32) -> f32 {
    c.max(0.0).min(1.0)
}

fn map(color: [f32; 3], f: impl Fn(f32) -> f32) -> [f32; 3] {
    [f(color[0]), f(color[1]), f(color[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn none_passes_color_through() {
        let color = [3.0, 0.5, -1.0];

        assert_eq!(ToneMapping::none().apply(color), color);
        assert_eq!(ToneMapping::none().glsl("c"), "c");
    }

    #[test]
    fn black_stays_black() {
        for &mode in &[Mode::Linear, Mode::Reinhard, Mode::Cineon] {
            let mapping = ToneMapping {
                mode,
                exposure: 1.5,
            };

            assert_eq!(mapping.apply([0.0; 3]), [0.0; 3]);
        }
    }

    #[test]
    fn cineon_is_monotonic_and_bounded() {
        let mapping = ToneMapping::default();

        let mut previous = 0.0;
        for i in 1..100 {
            let value = mapping.apply([i as f32 * 0.1; 3])[0];

            assert!(value >= previous);
            assert!(value < 1.0);
            previous = value;
        }
    }

    #[test]
    fn reinhard_applies_exposure_first() {
        let mapping = ToneMapping {
            mode: Mode::Reinhard,
            exposure: 2.0,
        };

        assert_relative_eq!(mapping.apply([1.0, 0.0, 0.0])[0], 2.0 / 3.0);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let corrected = gamma_correct([0.5, 0.0, 1.0], 2.2);

        assert_relative_eq!(corrected[0], 0.5f32.powf(1.0 / 2.2));
        assert_eq!(corrected[1], 0.0);
        assert_relative_eq!(corrected[2], 1.0);
    }

    #[test]
    fn glsl_uses_float_literals() {
        let mapping = ToneMapping {
            mode: Mode::Linear,
            exposure: 1.0,
        };

        assert_eq!(mapping.glsl("c"), "clamp((c * 1.0), 0.0, 1.0)");
    }
}
