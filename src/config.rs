use crate::tone_mapping::ToneMapping;

/// Parameters of the threshold-and-blur bloom.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomConfig {
    /// Spacing between blur taps, in texels.
    pub radius: f32,

    /// Luminance below which pixels do not bloom.
    pub threshold: f32,

    /// Multiplier applied to the blurred result.
    pub intensity: f32,

    /// Number of horizontal plus vertical blur rounds.
    pub iterations: usize,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            threshold: 0.2,
            intensity: 1.0,
            iterations: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bloom: BloomConfig,
    pub tone_mapping: ToneMapping,
    pub gamma_correction: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bloom: Default::default(),
            tone_mapping: Default::default(),
            gamma_correction: Some(2.2),
        }
    }
}
