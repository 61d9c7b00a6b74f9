//! Error types for pitch tracker configuration

use core::fmt;

/// Errors that can occur when creating a pitch tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The sample rate is not a positive, finite number
    InvalidSampleRate(f32),

    /// The hop size is zero or not a power of two
    InvalidHopSize(usize),

    /// The transform size implied by the hop size is out of range. Holds the
    /// base 2 logarithm of the transform size.
    UnsupportedTransformSize(u32),

    /// The number of peaks to consider is zero
    InvalidPeakCount(usize),

    /// The amplitude threshold is not a finite number
    InvalidThreshold(f32),

    /// The input gain is not a positive, finite number
    InvalidInputGain(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(value) => {
                write!(f, "Invalid sample rate: {}", value)
            }
            ConfigError::InvalidHopSize(value) => {
                write!(f, "Invalid hop size: {} is not a power of two", value)
            }
            ConfigError::UnsupportedTransformSize(exponent) => write!(
                f,
                "Unsupported transform size: 2^{} is outside 2^4 to 2^16",
                exponent
            ),
            ConfigError::InvalidPeakCount(value) => {
                write!(f, "Invalid peak count: {}", value)
            }
            ConfigError::InvalidThreshold(value) => {
                write!(f, "Invalid amplitude threshold: {}", value)
            }
            ConfigError::InvalidInputGain(value) => {
                write!(f, "Invalid input gain: {}", value)
            }
        }
    }
}

impl core::error::Error for ConfigError {}
