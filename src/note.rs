//! Mapping of frequencies to the notes of a
//! [twelve-tone equal temperament](https://en.wikipedia.org/wiki/Equal_temperament)
//! scale, tuned to A4 = 440 Hz.
//!
//! ```
//! use micro_ptrack::note::{closest_note, Note};
//!
//! let note_match = closest_note(446.0).unwrap();
//! assert_eq!(note_match.note, Note::A);
//! assert_eq!(note_match.octave, 4);
//! assert!(note_match.distance.is_sharp());
//! assert!(note_match.distance.is_perceptible());
//! ```

use core::fmt;

use crate::common::{freq_to_midi_note, midi_note_to_freq};

/// MIDI note number of C0.
const C0_MIDI_NOTE: i32 = 12;
/// Differences in pitch below this are hard to hear.
const PERCEPTIBLE_CENTS: f32 = 6.0;

/// A note of the chromatic scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Note {
    C,
    CSharpDFlat,
    D,
    DSharpEFlat,
    E,
    F,
    FSharpGFlat,
    G,
    GSharpAFlat,
    A,
    ASharpBFlat,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharpDFlat,
        Note::D,
        Note::DSharpEFlat,
        Note::E,
        Note::F,
        Note::FSharpGFlat,
        Note::G,
        Note::GSharpAFlat,
        Note::A,
        Note::ASharpBFlat,
        Note::B,
    ];

    /// The number of semitones above C.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Note {
        Note::ALL[index % 12]
    }

    /// The sharp and, where there is one, flat name of the note.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Note::C => &["C"],
            Note::CSharpDFlat => &["C♯", "D♭"],
            Note::D => &["D"],
            Note::DSharpEFlat => &["D♯", "E♭"],
            Note::E => &["E"],
            Note::F => &["F"],
            Note::FSharpGFlat => &["F♯", "G♭"],
            Note::G => &["G"],
            Note::GSharpAFlat => &["G♯", "A♭"],
            Note::A => &["A"],
            Note::ASharpBFlat => &["A♯", "B♭"],
            Note::B => &["B"],
        }
    }

    /// The frequency of the note in octave 0, in Hz.
    pub fn frequency(&self) -> f32 {
        midi_note_to_freq((C0_MIDI_NOTE + self.index() as i32) as f32)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// The distance between two frequencies in
/// [cents](https://en.wikipedia.org/wiki/Cent_%28music%29).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MusicalDistance {
    pub cents: f32,
}

impl MusicalDistance {
    pub const OCTAVE: MusicalDistance = MusicalDistance { cents: 1200.0 };

    pub fn new(cents: f32) -> Self {
        MusicalDistance { cents }
    }

    /// The distance from `from` to `to`, positive if `to` is higher.
    pub fn between(from: f32, to: f32) -> Self {
        MusicalDistance {
            cents: MusicalDistance::OCTAVE.cents * libm::log2f(to / from),
        }
    }

    pub fn is_perceptible(&self) -> bool {
        self.cents.abs() > PERCEPTIBLE_CENTS
    }

    pub fn is_flat(&self) -> bool {
        self.cents < 0.0
    }

    pub fn is_sharp(&self) -> bool {
        self.cents > 0.0
    }
}

/// The note closest to some frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteMatch {
    pub note: Note,
    /// Scientific pitch notation octave, 4 for A4. Can be negative.
    pub octave: i32,
    /// The distance from the exact note frequency to the matched frequency.
    pub distance: MusicalDistance,
}

impl NoteMatch {
    /// The exact frequency of the matched note, in Hz.
    pub fn frequency(&self) -> f32 {
        midi_note_to_freq(self.midi_note_number() as f32)
    }

    pub fn midi_note_number(&self) -> i32 {
        C0_MIDI_NOTE + 12 * self.octave + self.note.index() as i32
    }

    /// Names the match as written for an instrument in `transposition`,
    /// i.e. an instrument whose written C sounds as `transposition`.
    pub fn in_transposition(&self, transposition: Note) -> NoteMatch {
        let semitones_from_c = transposition.index();
        if semitones_from_c == 0 {
            return *self;
        }
        let note_offset = (12 - semitones_from_c) + self.note.index();
        let octave_shift = if note_offset > 11 { 1 } else { 0 };
        NoteMatch {
            note: Note::from_index(note_offset),
            octave: self.octave + octave_shift,
            distance: self.distance,
        }
    }
}

impl fmt::Display for NoteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {:+.1} cents", self.note.names()[0], self.octave, self.distance.cents)
    }
}

/// Finds the note closest to `frequency`. Returns `None` unless the frequency
/// is positive and finite.
pub fn closest_note(frequency: f32) -> Option<NoteMatch> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }
    let midi_note = freq_to_midi_note(frequency);
    let nearest = libm::roundf(midi_note) as i32;
    let semitones_above_c0 = nearest - C0_MIDI_NOTE;
    Some(NoteMatch {
        note: Note::from_index(semitones_above_c0.rem_euclid(12) as usize),
        octave: semitones_above_c0.div_euclid(12),
        distance: MusicalDistance::new(100.0 * (midi_note - nearest as f32)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_note_frequencies() {
        assert!((Note::C.frequency() - 16.3516).abs() < 1e-3);
        assert!((Note::A.frequency() - 27.5).abs() < 1e-3);
        assert!((Note::B.frequency() - 30.86771).abs() < 1e-3);
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.index(), i);
            assert_eq!(Note::from_index(i + 12), *note);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Note::C.to_string(), "C");
        assert_eq!(Note::FSharpGFlat.to_string(), "F♯/G♭");
        assert_eq!(Note::ASharpBFlat.names(), &["A♯", "B♭"]);
    }

    #[test]
    fn test_exact_notes() {
        let a4 = closest_note(440.0).unwrap();
        assert_eq!(a4.note, Note::A);
        assert_eq!(a4.octave, 4);
        assert!(!a4.distance.is_perceptible());
        assert_eq!(a4.midi_note_number(), 69);
        assert!((a4.frequency() - 440.0).abs() < 1e-3);

        let c4 = closest_note(261.6256).unwrap();
        assert_eq!(c4.note, Note::C);
        assert_eq!(c4.octave, 4);

        let c0 = closest_note(16.3516).unwrap();
        assert_eq!(c0.note, Note::C);
        assert_eq!(c0.octave, 0);
    }

    #[test]
    fn test_scale_boundary() {
        // Slightly flat C5 must not be matched as B4
        let flat_c5 = closest_note(midi_note_to_freq(71.9)).unwrap();
        assert_eq!(flat_c5.note, Note::C);
        assert_eq!(flat_c5.octave, 5);
        assert!(flat_c5.distance.is_flat());
        assert!((flat_c5.distance.cents + 10.0).abs() < 0.2);

        let sharp_b3 = closest_note(midi_note_to_freq(59.3)).unwrap();
        assert_eq!(sharp_b3.note, Note::B);
        assert_eq!(sharp_b3.octave, 3);
        assert!(sharp_b3.distance.is_sharp());
    }

    #[test]
    fn test_below_c0() {
        let note_match = closest_note(midi_note_to_freq(4.0)).unwrap();
        assert_eq!(note_match.octave, -1);
        assert_eq!(note_match.note, Note::E);
    }

    #[test]
    fn test_invalid_frequency() {
        assert_eq!(closest_note(0.0), None);
        assert_eq!(closest_note(-440.0), None);
        assert_eq!(closest_note(f32::NAN), None);
        assert_eq!(closest_note(f32::INFINITY), None);
    }

    #[test]
    fn test_distance() {
        let octave = MusicalDistance::between(220.0, 440.0);
        assert!((octave.cents - 1200.0).abs() < 1e-3);
        let down = MusicalDistance::between(440.0, 435.0);
        assert!(down.is_flat());
        assert!(down.is_perceptible());
        assert!(!MusicalDistance::new(-5.0).is_perceptible());
        assert!(!MusicalDistance::default().is_flat());
        assert!(!MusicalDistance::default().is_sharp());
    }

    #[test]
    fn test_transposition() {
        let concert_c4 = closest_note(261.6256).unwrap();
        // B flat instruments read a concert C as D
        let written = concert_c4.in_transposition(Note::ASharpBFlat);
        assert_eq!(written.note, Note::D);
        assert_eq!(written.octave, 4);

        // E flat instruments read a concert C as A
        let written = concert_c4.in_transposition(Note::DSharpEFlat);
        assert_eq!(written.note, Note::A);
        assert_eq!(written.octave, 4);

        let concert_b4 = closest_note(493.8833).unwrap();
        let written = concert_b4.in_transposition(Note::ASharpBFlat);
        assert_eq!(written.note, Note::CSharpDFlat);
        assert_eq!(written.octave, 5);
        assert_eq!(written.distance, concert_b4.distance);

        assert_eq!(concert_b4.in_transposition(Note::C), concert_b4);
    }
}
