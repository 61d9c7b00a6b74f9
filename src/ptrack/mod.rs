//! A rust implementation of the ptrack [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29)
//! tracker from Csound, by Victor Lazzarini, based on Miller Puckette's `fiddle~`
//! algorithm. It is used for tracking the pitch and loudness of monophonic,
//! primarily musical, sounds.
//!
//! Each hop goes through the following steps:
//! * The current hop is transformed and combined with the previous one into a
//!   spectrum of two hops, sampled at twice the transform resolution.
//! * Power totals decide whether the hop is loud enough to be analyzed.
//! * Spectral peaks are located with sub-bin accuracy. Each peak frequency is
//!   estimated three times and the spread of the estimates is its width.
//! * Every peak votes for the fundamentals it could be a harmonic of, in a
//!   histogram with 48 bins per octave.
//! * The peaks that agree with the best histogram bin are averaged into the
//!   final frequency, weighted by their narrowness and harmonic number.
//!
//! The implementation is suitable for real time use. No memory is allocated
//! apart from on initialization.
//!
//! # Examples
//! ## High level API
//! Collects input samples into hops and analyzes each newly filled hop.
//! ```
//! use micro_ptrack::ptrack::PitchDetector;
//!
//! // Create an input buffer containing a pure tone at 440 Hz.
//! let sample_rate = 44100.0;
//! let sine_frequency = 440.0;
//! let mut chunk: Vec<f32> = vec![0.0; 10000];
//! for i in 0..chunk.len() {
//!     let sine_value = (2.0 * core::f32::consts::PI * sine_frequency * (i as f32) / sample_rate).sin();
//!     chunk[i] = sine_value;
//! }
//!
//! // Create a pitch detector instance
//! let hop_size = 1024; // Pitch is computed every hop_size samples
//! let peak_count = 20; // The maximum number of spectral peaks to consider
//! let mut detector = PitchDetector::new(sample_rate, hop_size, peak_count).unwrap();
//!
//! // Perform pitch detection. The detector invokes the provided callback
//! // when a new hop has been analyzed.
//! let mut hop_index = 0;
//! detector.process(&chunk[..], |result| {
//!     // The first hops are analyzed with a partly empty window
//!     if hop_index >= 2 {
//!         let frequency = result.frequency().unwrap();
//!         assert!((sine_frequency - frequency).abs() <= 0.01 * sine_frequency);
//!     }
//!     hop_index += 1;
//! });
//! ```
//! ## Low level API
//! Used to process hops directly and to inspect intermediate results.
//! ```
//! use micro_ptrack::ptrack::{PTrackConfig, PitchResult, PitchTracker};
//!
//! let config = PTrackConfig {
//!     sample_rate: 22050.0,
//!     hop_size: 512,
//!     ..Default::default()
//! };
//! let mut tracker = PitchTracker::from_config(&config).unwrap();
//! let hop = vec![0.0; 512];
//! match tracker.process_hop(&hop) {
//!     PitchResult::Pitch { frequency, loudness } => println!("{} Hz, {} dB", frequency, loudness),
//!     PitchResult::NoPitch => println!("No pitch, level {} dB", tracker.level_db()),
//! }
//! ```

mod config;
mod consensus;
mod detector;
mod histogram;
mod level;
mod peaks;
mod result;
mod spectrum;
mod tracker;

pub use config::{PTrackConfig, MAX_TRANSFORM_EXPONENT, MIN_TRANSFORM_EXPONENT};
pub use consensus::HarmonicSums;
pub use detector::PitchDetector;
pub use histogram::{HistogramCandidate, BINS_PER_OCTAVE, HARMONIC_OFFSETS};
pub use level::{PowerTotals, DB_OFFSET, HISTORY_LENGTH};
pub use peaks::Peak;
pub use result::PitchResult;
pub use spectrum::{SpectrumBuilder, BIN_STRIDE};
pub use tracker::PitchTracker;
