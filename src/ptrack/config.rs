use crate::ConfigError;

/// Smallest and largest supported base 2 logarithm of the window size.
pub const MIN_TRANSFORM_EXPONENT: u32 = 4;
pub const MAX_TRANSFORM_EXPONENT: u32 = 16;

/// Pitch tracker settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PTrackConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// The number of samples per hop. The analysis window spans two hops.
    pub hop_size: usize,
    /// The maximum number of spectral peaks considered per hop.
    pub peak_count: usize,
    /// Hops quieter than this, on the tracker's dB scale, are not analyzed.
    pub amplitude_threshold_db: f32,
    /// Input samples are multiplied by this before analysis. The default
    /// maps a full scale signal in `[-1, 1]` to the 16 bit range the
    /// thresholds are tuned for.
    pub input_gain: f32,
}

impl Default for PTrackConfig {
    fn default() -> Self {
        PTrackConfig {
            sample_rate: 44100.0,
            hop_size: 4096,
            peak_count: 20,
            amplitude_threshold_db: 40.0,
            input_gain: 32768.0,
        }
    }
}

impl PTrackConfig {
    /// Creates a config with default threshold and gain.
    pub fn new(sample_rate: f32, hop_size: usize, peak_count: usize) -> Self {
        PTrackConfig {
            sample_rate,
            hop_size,
            peak_count,
            ..Default::default()
        }
    }

    /// The analysis window size, twice the hop size.
    pub fn window_size(&self) -> usize {
        2 * self.hop_size
    }

    /// Checks that all fields are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if !self.hop_size.is_power_of_two() {
            return Err(ConfigError::InvalidHopSize(self.hop_size));
        }
        let exponent = self.window_size().trailing_zeros();
        if !(MIN_TRANSFORM_EXPONENT..=MAX_TRANSFORM_EXPONENT).contains(&exponent) {
            return Err(ConfigError::UnsupportedTransformSize(exponent));
        }
        if self.peak_count == 0 {
            return Err(ConfigError::InvalidPeakCount(self.peak_count));
        }
        if !self.amplitude_threshold_db.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.amplitude_threshold_db));
        }
        if !(self.input_gain.is_finite() && self.input_gain > 0.0) {
            return Err(ConfigError::InvalidInputGain(self.input_gain));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PTrackConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.window_size(), 8192);
    }

    #[test]
    fn test_invalid_fields() {
        let valid = PTrackConfig::new(44100.0, 1024, 20);
        assert_eq!(valid.validate(), Ok(()));

        let config = PTrackConfig {
            sample_rate: 0.0,
            ..valid.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSampleRate(0.0)));

        let config = PTrackConfig {
            sample_rate: f32::INFINITY,
            ..valid.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSampleRate(_))
        ));

        let config = PTrackConfig {
            hop_size: 0,
            ..valid.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidHopSize(0)));

        let config = PTrackConfig {
            hop_size: 1000,
            ..valid.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidHopSize(1000)));

        let config = PTrackConfig {
            hop_size: 4,
            ..valid.clone()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedTransformSize(3))
        );

        let config = PTrackConfig {
            hop_size: 1 << 16,
            ..valid.clone()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedTransformSize(17))
        );

        let config = PTrackConfig {
            peak_count: 0,
            ..valid.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPeakCount(0)));

        let config = PTrackConfig {
            amplitude_threshold_db: f32::NAN,
            ..valid.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));

        let config = PTrackConfig {
            input_gain: -1.0,
            ..valid
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidInputGain(-1.0)));
    }
}
