//! A rust implementation of the ptrack pitch tracker, used for estimating the
//! [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) and loudness of
//! monophonic sounds like a voice or a single instrument. It cannot be used to
//! detect multiple pitches at once, like in a musical chord.
//!
//! Audio is analyzed in hops of a fixed, power of two size. Each hop is
//! windowed and transformed into an interpolated spectrum, the spectral peaks
//! are matched against a harmonic template on a logarithmic frequency axis and
//! the best candidate is refined by a weighted average over the harmonics that
//! agree with it.
//!
//! Features
//! * `no_std` compatible. All allocations happen when a tracker is created,
//! so hops can be processed on a real time audio thread.
//! * Includes a split radix complex FFT, see the [`fft`] module.
//! * Musical note helpers, see the [`note`] module.
//!
//! # Examples
//!
//! Streaming API, collecting chunks of arbitrary size into hops.
//!
//! ```
//! use micro_ptrack::ptrack::{PitchDetector, PitchResult};
//!
//! let sample_rate = 44100.0;
//! let mut detector = PitchDetector::new(sample_rate, 1024, 20).unwrap();
//! let chunk: Vec<f32> = (0..4096)
//!     .map(|i| (2.0 * core::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin())
//!     .collect();
//! detector.process(&chunk, |result| {
//!     if let PitchResult::Pitch { frequency, loudness } = result {
//!         println!("pitch {} Hz, loudness {} dB", frequency, loudness);
//!     }
//! });
//! ```
//!
//! Per hop API, used to process one hop directly.
//!
//! ```
//! use micro_ptrack::ptrack::{PTrackConfig, PitchTracker};
//!
//! let config = PTrackConfig {
//!     hop_size: 512,
//!     ..Default::default()
//! };
//! let mut tracker = PitchTracker::from_config(&config).unwrap();
//! let hop = vec![0.0; 512];
//! let result = tracker.process_hop(&hop);
//! assert!(!result.is_pitched());
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod common;
mod error;
pub mod fft;
pub mod note;
pub mod ptrack;

pub use error::ConfigError;
