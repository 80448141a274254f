//! Synthesis configuration.
//!
//! Earlier script-era versions of this simulator disagreed on canvas size,
//! bias pedestal, and exposure handling; those knobs live here so a single
//! synthesizer covers every variant.

use std::time::Duration;

/// Configuration for one frame-synthesis setup.
///
/// `bias_e` is the constant offset the readout electronics add to keep
/// values non-negative; `bias_pedestal_e` is an additional shift of the
/// read-noise mean that some calibration campaigns apply on top of the
/// bias (historically +5 e⁻). Read noise RMS for this detector is 10 e⁻.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Canvas height in pixels
    pub height: usize,
    /// Canvas width in pixels
    pub width: usize,
    /// Bias level in photo-electrons
    pub bias_e: f64,
    /// Extra shift applied to the read-noise mean, in photo-electrons
    pub bias_pedestal_e: f64,
    /// Read noise RMS in photo-electrons
    pub read_noise_rms_e: f64,
    /// Per-frame integration time, scales the filter photon rate
    pub exposure: Duration,
}

impl SynthesisConfig {
    /// Mean of the additive read-noise distribution.
    pub fn read_noise_mean_e(&self) -> f64 {
        self.bias_e + self.bias_pedestal_e
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            height: 320,
            width: 320,
            bias_e: 1500.0,
            bias_pedestal_e: 5.0,
            read_noise_rms_e: 10.0,
            exposure: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_matches_flight_detector() {
        let config = SynthesisConfig::default();
        assert_eq!((config.height, config.width), (320, 320));
        assert_relative_eq!(config.read_noise_mean_e(), 1505.0);
        assert_relative_eq!(config.read_noise_rms_e, 10.0);
    }

    #[test]
    fn test_pedestal_can_be_disabled() {
        let config = SynthesisConfig {
            bias_pedestal_e: 0.0,
            ..SynthesisConfig::default()
        };
        assert_relative_eq!(config.read_noise_mean_e(), 1500.0);
    }
}
