use crate::common::freq_to_midi_note;

/// The outcome of analyzing a hop.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchResult {
    /// A fundamental frequency was found.
    Pitch {
        /// The fundamental frequency in Hz.
        frequency: f32,
        /// Loudness of the harmonics agreeing with the fundamental, in dB.
        loudness: f32,
    },
    /// The hop was too quiet or had no consistent harmonic structure.
    #[default]
    NoPitch,
}

impl PitchResult {
    pub fn is_pitched(&self) -> bool {
        matches!(self, PitchResult::Pitch { .. })
    }

    /// The detected frequency in Hz, if any.
    pub fn frequency(&self) -> Option<f32> {
        match self {
            PitchResult::Pitch { frequency, .. } => Some(*frequency),
            PitchResult::NoPitch => None,
        }
    }

    /// The loudness in dB of the detected pitch, if any.
    pub fn loudness(&self) -> Option<f32> {
        match self {
            PitchResult::Pitch { loudness, .. } => Some(*loudness),
            PitchResult::NoPitch => None,
        }
    }

    /// The MIDI note number of the detected frequency, if any.
    pub fn midi_note_number(&self) -> Option<f32> {
        self.frequency().map(freq_to_midi_note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let result = PitchResult::Pitch {
            frequency: 440.0,
            loudness: 60.0,
        };
        assert!(result.is_pitched());
        assert_eq!(result.frequency(), Some(440.0));
        assert_eq!(result.loudness(), Some(60.0));
        assert!((result.midi_note_number().unwrap() - 69.0).abs() < 0.01);

        let result = PitchResult::default();
        assert!(!result.is_pitched());
        assert_eq!(result.frequency(), None);
        assert_eq!(result.midi_note_number(), None);
    }
}
