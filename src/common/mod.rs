//! Common algorithms and utilities.

mod hop_buffer;
mod midi;

pub use hop_buffer::HopBuffer;
pub use midi::{freq_to_midi_note, midi_note_to_freq};
