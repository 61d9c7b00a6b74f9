//! In-place split radix (8/4/2) complex FFT.
//!
//! The transform operates on interleaved complex values (`re, im, re, im, ...`)
//! and computes the unnormalized forward DFT
//! `X_k = sum_j x_j exp(-2 pi i j k / N)`. After a combined bit reversal and
//! radix 2 pass, the remaining stages are radix 8, preceded by a single radix 2
//! or radix 4 pass when the number of stages doesn't divide evenly. Transforms
//! larger than 2^[`DEFAULT_CACHE_EXPONENT`] points are split recursively into
//! eight sub transforms so each one fits in cache. The result is the same, bit
//! for bit, whatever the cache exponent.
//!
//! A [`TransformPlan`] built for 2^m points can also run the 2^(m - 1) point
//! transform, see [`TransformPlan::half_fft`].
//!
//! # Example
//!
//! ```
//! use micro_ptrack::fft::TransformPlan;
//!
//! let plan = TransformPlan::new(4);
//! // An impulse transforms to a flat spectrum
//! let mut buffer = [0.0_f32; 32];
//! buffer[0] = 1.0;
//! plan.fft(&mut buffer);
//! assert!(buffer.chunks(2).all(|bin| bin[0] == 1.0 && bin[1] == 0.0));
//! ```

mod kernels;
mod stages;
mod tables;

use alloc::boxed::Box;

pub use tables::{bit_reverse_table, cosine_table};

/// Transforms of at most 2^`DEFAULT_CACHE_EXPONENT` points run their radix 8
/// stages in a single flat pass.
pub const DEFAULT_CACHE_EXPONENT: u32 = 11;

/// The largest supported exponent.
pub const MAX_EXPONENT: u32 = 28;

const MIN_CACHE_EXPONENT: u32 = 3;

/// Precomputed tables for transforms of 2^`exponent` and 2^(`exponent` - 1)
/// points. Plans are immutable once built and can be shared freely.
pub struct TransformPlan {
    exponent: u32,
    cache_exponent: u32,
    cosine_table: Box<[f32]>,
    bit_reverse: Box<[usize]>,
    half_bit_reverse: Box<[usize]>,
}

impl TransformPlan {
    /// Creates a plan for transforms of 2^`exponent` complex points.
    pub fn new(exponent: u32) -> Self {
        TransformPlan::with_cache_exponent(exponent, DEFAULT_CACHE_EXPONENT)
    }

    /// Creates a plan with a custom cache fit exponent. Mostly useful for
    /// tuning and testing the recursive code path.
    pub fn with_cache_exponent(exponent: u32, cache_exponent: u32) -> Self {
        if exponent > MAX_EXPONENT {
            panic!("FFT exponent must not be greater than {}", MAX_EXPONENT)
        }
        if cache_exponent < MIN_CACHE_EXPONENT {
            panic!("Cache exponent must be at least {}", MIN_CACHE_EXPONENT)
        }
        TransformPlan {
            exponent,
            cache_exponent,
            cosine_table: cosine_table(exponent),
            bit_reverse: bit_reverse_table(exponent),
            half_bit_reverse: bit_reverse_table(exponent.saturating_sub(1)),
        }
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// The number of complex points of the full size transform.
    pub fn size(&self) -> usize {
        1 << self.exponent
    }

    pub fn cache_exponent(&self) -> u32 {
        self.cache_exponent
    }

    /// Runs the 2^exponent point transform. `buffer` holds interleaved complex
    /// values and must contain exactly `2 * self.size()` floats.
    pub fn fft(&self, buffer: &mut [f32]) {
        assert_eq!(
            buffer.len(),
            2 * self.size(),
            "FFT buffer must hold {} interleaved complex values",
            self.size()
        );
        stages::transform(
            buffer,
            self.exponent,
            &self.cosine_table,
            1,
            &self.bit_reverse,
            self.cache_exponent,
        );
    }

    /// Runs the 2^(exponent - 1) point transform, reusing this plan's cosine
    /// table with a twiddle stride of 2. `buffer` must contain exactly
    /// `self.size()` floats.
    pub fn half_fft(&self, buffer: &mut [f32]) {
        if self.exponent == 0 {
            panic!("A plan for a single point has no half size transform")
        }
        assert_eq!(
            buffer.len(),
            self.size(),
            "Half size FFT buffer must hold {} interleaved complex values",
            self.size() / 2
        );
        stages::transform(
            buffer,
            self.exponent - 1,
            &self.cosine_table,
            2,
            &self.half_bit_reverse,
            self.cache_exponent,
        );
    }
}
