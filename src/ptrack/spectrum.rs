use alloc::{boxed::Box, vec};
use core::f32::consts::{PI, SQRT_2};

use crate::fft::TransformPlan;

/// Taps of the interpolation filter on each side of a bin.
const FILTER_LENGTH: usize = 5;
/// Floats of padding around the padded frame, one filter reach.
const GUARD: usize = 2 * FILTER_LENGTH;
const COEF1: f32 = 0.5 * 1.227054;
const COEF2: f32 = 0.5 * -0.302385;
const COEF3: f32 = 0.5 * 0.095326;
const COEF4: f32 = 0.5 * -0.022748;
const COEF5: f32 = 0.5 * 0.002533;
const HALF_SQRT_TWO: f32 = SQRT_2 / 2.0;

/// Floats per refined bin: real part, imaginary part, power and running
/// power total.
pub const BIN_STRIDE: usize = 4;
/// Bins below this index carry no power and are never considered peaks.
pub const MIN_BIN: usize = 3;
/// Zeroed floats past the last refined bin, covering the reach of the peak
/// frequency estimator.
const SPECTRUM_GUARD: usize = 20;

/// Turns hops of samples into a spectrum with twice the resolution of the
/// transform, interpolated from the current and the previous hop.
///
/// For a hop size `h` and a window size `n = 2 h`, the refined spectrum holds
/// `n` bins of [`BIN_STRIDE`] floats each, bin `b` being centered at
/// `b * sample_rate / (2 n)` Hz.
pub struct SpectrumBuilder {
    hop_size: usize,
    plan: TransformPlan,
    // Interleaved cos(pi i / n), -sin(pi i / n)
    basis: Box<[f32]>,
    refined: Box<[f32]>,
    padded: Box<[f32]>,
    previous: Box<[f32]>,
}

impl SpectrumBuilder {
    /// Creates a builder for hops of `hop_size` samples. `hop_size` must be a
    /// power of two of at least 8.
    pub fn new(hop_size: usize) -> Self {
        if hop_size < 8 || !hop_size.is_power_of_two() {
            panic!("Hop size must be a power of two of at least 8")
        }
        let window_size = 2 * hop_size;
        let basis = (0..hop_size)
            .flat_map(|i| {
                let angle = (PI * i as f32) / (window_size as f32);
                [libm::cosf(angle), -libm::sinf(angle)]
            })
            .collect::<alloc::vec::Vec<f32>>()
            .into_boxed_slice();

        SpectrumBuilder {
            hop_size,
            plan: TransformPlan::new(window_size.trailing_zeros()),
            basis,
            refined: vec![0.; BIN_STRIDE * window_size + SPECTRUM_GUARD].into_boxed_slice(),
            padded: vec![0.; 2 * window_size + 2 * GUARD].into_boxed_slice(),
            previous: vec![0.; window_size + 2 * GUARD].into_boxed_slice(),
        }
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn window_size(&self) -> usize {
        2 * self.hop_size
    }

    /// The refined spectrum of the most recent hop.
    pub fn refined(&self) -> &[f32] {
        &self.refined
    }

    pub(super) fn refined_mut(&mut self) -> &mut [f32] {
        &mut self.refined
    }

    /// Clears the spectrum and the stored previous hop.
    pub fn reset(&mut self) {
        self.refined.fill(0.0);
        self.padded.fill(0.0);
        self.previous.fill(0.0);
    }

    /// Builds the refined spectrum of `signal`, which must hold exactly one hop.
    pub fn build(&mut self, signal: &[f32]) {
        assert_eq!(signal.len(), self.hop_size, "Signal must hold exactly one hop");
        self.transform(signal);
        self.pad();
        self.interpolate();
        self.finish();
    }

    fn transform(&mut self, signal: &[f32]) {
        let window_size = self.window_size();
        for (i, sample) in signal.iter().enumerate() {
            self.refined[2 * i] = sample * self.basis[2 * i];
            self.refined[2 * i + 1] = sample * self.basis[2 * i + 1];
        }
        self.plan.half_fft(&mut self.refined[..window_size]);
    }

    /// Lays out the transformed bins so the filter in `interpolate` can run
    /// over even and odd refined bins with a single stride.
    fn pad(&mut self) {
        let window_size = self.window_size();
        let spectrum = &self.refined;
        let padded = &mut self.padded;

        // Lower half of the bins, in order, to even slots
        let mut k = GUARD;
        for i in (0..self.hop_size).step_by(2) {
            padded[k] = spectrum[i];
            padded[k + 1] = spectrum[i + 1];
            k += 4;
        }

        // All bins, reversed and conjugated, to odd slots
        k = GUARD + 2;
        for i in (0..window_size).step_by(2).rev() {
            padded[k] = spectrum[i];
            padded[k + 1] = -spectrum[i + 1];
            k += 4;
        }

        // Conjugate mirror below the first bin
        for (step, i) in (GUARD..2 * GUARD).step_by(2).enumerate() {
            let k = GUARD - 2 - 2 * step;
            padded[k] = padded[i];
            padded[k + 1] = -padded[i + 1];
        }

        // Reflected top guard. The imaginary parts are negated in place.
        k = GUARD + window_size;
        for i in (0..window_size).step_by(2).rev() {
            padded[k] = padded[i];
            padded[k + 1] = -padded[k + 1];
            k += 2;
        }
    }

    fn interpolate(&mut self) {
        let p = &self.previous;
        let s = &self.padded;
        let out = &mut self.refined;

        let mut j = 0;
        let mut k = GUARD;
        for _ in 0..self.hop_size / 2 {
            // The two first taps of the even bins are asymmetric, as in
            // Csound's ptrack.
            let re = COEF1 * (p[k - 2] - p[k + 1] + s[k - 2] - p[k + 1])
                + COEF2 * (p[k - 3] - p[k + 2] + s[k - 3] - s[2])
                + COEF3 * (-p[k - 6] + p[k + 5] - s[k - 6] + s[k + 5])
                + COEF4 * (-p[k - 7] + p[k + 6] - s[k - 7] + s[k + 6])
                + COEF5 * (p[k - 10] - p[k + 9] + s[k - 10] - s[k + 9]);

            let im = COEF1 * (p[k - 1] + p[k] + s[k - 1] + s[k])
                + COEF2 * (-p[k - 4] - p[k + 3] - s[k - 4] - s[k + 3])
                + COEF3 * (-p[k - 5] - p[k + 4] - s[k - 5] - s[k + 4])
                + COEF4 * (p[k - 8] + p[k + 7] + s[k - 8] + s[k + 7])
                + COEF5 * (p[k - 9] + p[k + 8] + s[k - 9] + s[k + 8]);

            out[j] = HALF_SQRT_TWO * (re + im);
            out[j + 1] = HALF_SQRT_TWO * (im - re);
            out[j + 4] = p[k] + s[k + 1];
            out[j + 5] = p[k + 1] - s[k];

            j += 8;
            k += 2;

            let re = COEF1 * (p[k - 2] - p[k + 1] - s[k - 2] + s[k + 1])
                + COEF2 * (p[k - 3] - p[k + 2] - s[k - 3] + s[k + 2])
                + COEF3 * (-p[k - 6] + p[k + 5] + s[k - 6] - s[k + 5])
                + COEF4 * (-p[k - 7] + p[k + 6] + s[k - 7] - s[k + 6])
                + COEF5 * (p[k - 10] - p[k + 9] - s[k - 10] + s[k + 9]);

            let im = COEF1 * (p[k - 1] + p[k] - s[k - 1] - s[k])
                + COEF2 * (-p[k - 4] - p[k + 3] + s[k - 4] + s[k + 3])
                + COEF3 * (-p[k - 5] - p[k + 4] + s[k - 5] + s[k + 4])
                + COEF4 * (p[k - 8] + p[k + 7] - s[k - 8] - s[k + 7])
                + COEF5 * (p[k - 9] + p[k + 8] - s[k - 9] - s[k + 8]);

            out[j] = HALF_SQRT_TWO * (re + im);
            out[j + 1] = HALF_SQRT_TWO * (im - re);
            out[j + 4] = p[k] - s[k + 1];
            out[j + 5] = p[k + 1] + s[k];

            j += 8;
            k += 2;
        }
    }

    fn finish(&mut self) {
        let count = self.previous.len();
        self.previous.copy_from_slice(&self.padded[..count]);
        for bin in 0..MIN_BIN {
            self.refined[BIN_STRIDE * bin + 2] = 0.0;
            self.refined[BIN_STRIDE * bin + 3] = 0.0;
        }
    }
}
