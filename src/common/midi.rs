use micromath::F32Ext;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// Converts a (fractional) MIDI note number to a frequency in Hz, using A4 = 440 Hz.
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * libm::exp2f((note - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_approximate_note_number() {
        // The hz to midi note conversion relies on the approximate log2
        // function of the micromath crate. This test compares this
        // approximation to std's log2 and makes sure the difference
        // is acceptable.

        // The maximum acceptable error in cents. 0.1 is 1/1000th of a semitone.
        let max_cent_error = 0.11_f32;
        for i in 1..10000 {
            let f = i as f32;
            let actual_note_number = 12.0 * (f / 440.0).log2() + 69.0;
            let approx_note_number = freq_to_midi_note(f);
            let delta_cents = 100. * (actual_note_number - approx_note_number);
            assert!(delta_cents.abs() <= max_cent_error);
        }
    }

    #[test]
    fn test_note_to_freq() {
        assert!((midi_note_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(57.0) - 220.0).abs() < 1e-3);
        // C0
        assert!((midi_note_to_freq(12.0) - 16.3516).abs() < 1e-3);
        for i in 20..120 {
            let note = i as f32 + 0.25;
            assert!((freq_to_midi_note(midi_note_to_freq(note)) - note).abs() < 0.0011);
        }
    }
}
