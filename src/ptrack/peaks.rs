use alloc::vec::Vec;

use super::spectrum::{BIN_STRIDE, MIN_BIN};

/// Peaks with neighbours weaker than this fraction of the total power are ignored.
const MIN_NEIGHBOUR_POWER: f32 = 0.00001;
/// Peaks whose frequency estimates disagree by more than this, relative to
/// the peak power over the total power, are ignored.
const MAX_SPREAD: f32 = 10.0;
const MIN_VARIANCE: f32 = 1.0e-30;
/// Peak frequencies are clamped to at least this many refined bins.
const MIN_PEAK_FREQUENCY: f32 = 4.0;

/// A spectral peak of the refined spectrum.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Peak {
    /// The frequency in refined bins, with a fractional part.
    pub frequency: f64,
    /// The standard deviation of the frequency estimates, in refined bins.
    pub width: f64,
    pub power: f64,
    /// The fourth root of the power.
    pub loudness: f64,
}

/// Finds local power maxima in `refined`, strictly above both neighbours, in increasing frequency order,
/// until `peaks` holds `max_peak_count` peaks. Expects the power slots to
/// have been filled in by [`PowerTotals::compute`](super::level::PowerTotals::compute).
///
/// Each peak frequency is estimated from the spectrum around the peak bin and
/// around its two neighbours. Peaks where these three estimates disagree are
/// most likely noise and are rejected.
pub fn find_peaks(
    refined: &[f32],
    window_size: usize,
    total_power: f64,
    max_peak_count: usize,
    peaks: &mut Vec<Peak>,
) {
    let s = refined;
    let total_power = total_power as f32;
    peaks.clear();

    for i in (BIN_STRIDE * MIN_BIN..BIN_STRIDE * (window_size - 2)).step_by(BIN_STRIDE) {
        if peaks.len() >= max_peak_count {
            break;
        }
        let height = s[i + 2];
        let h1 = s[i - 2];
        let h2 = s[i + 6];
        if height <= h1
            || height <= h2
            || h1 < MIN_NEIGHBOUR_POWER * total_power
            || h2 < MIN_NEIGHBOUR_POWER * total_power
        {
            continue;
        }

        let peak_offset = ((s[i - 8] - s[i + 8]) * (2.0 * s[i] - s[i + 8] - s[i - 8])
            + (s[i - 7] - s[i + 9]) * (2.0 * s[i + 1] - s[i + 9] - s[i - 7]))
            / (height + height);
        let left_offset = ((s[i - 12] - s[i + 4]) * (2.0 * s[i - 4] - s[i + 4] - s[i - 12])
            + (s[i - 11] - s[i + 5]) * (2.0 * s[i - 3] - s[i + 5] - s[i - 11]))
            / (2.0 * h1)
            - 1.0;
        let right_offset = ((s[i - 4] - s[i + 12]) * (2.0 * s[i + 4] - s[i + 12] - s[i - 4])
            + (s[i - 3] - s[i + 13]) * (2.0 * s[i + 5] - s[i + 13] - s[i - 3]))
            / (2.0 * h2)
            + 1.0;

        let mean = (peak_offset + left_offset + right_offset) / 3.0;
        let variance = ((peak_offset - mean) * (peak_offset - mean)
            + (left_offset - mean) * (left_offset - mean)
            + (right_offset - mean) * (right_offset - mean))
            / 2.0;

        if variance * total_power > MAX_SPREAD * height
            || variance.is_nan()
            || variance < MIN_VARIANCE
        {
            continue;
        }

        let frequency = ((i / BIN_STRIDE) as f32 + mean).max(MIN_PEAK_FREQUENCY);
        peaks.push(Peak {
            frequency: frequency as f64,
            width: libm::sqrtf(variance) as f64,
            power: height as f64,
            loudness: libm::sqrt(libm::sqrt(height as f64)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptrack::consensus::estimate;
    use crate::ptrack::histogram::Histogram;
    use crate::ptrack::level::PowerTotals;
    use crate::ptrack::result::PitchResult;
    use alloc::vec;

    const WINDOW_SIZE: usize = 128;

    fn empty_spectrum() -> Vec<f32> {
        vec![0.0; BIN_STRIDE * WINDOW_SIZE + 20]
    }

    /// Adds the twice zero padded transform of WINDOW_SIZE samples of a
    /// complex exponential at `frequency` refined bins.
    fn add_partial(spectrum: &mut [f32], frequency: f64, amplitude: f64) {
        for bin in 0..WINDOW_SIZE {
            let mut re = 0.0;
            let mut im = 0.0;
            for t in 0..WINDOW_SIZE {
                let phase = core::f64::consts::PI * (frequency - bin as f64) * t as f64
                    / WINDOW_SIZE as f64;
                re += phase.cos();
                im += phase.sin();
            }
            spectrum[BIN_STRIDE * bin] += (amplitude * re) as f32;
            spectrum[BIN_STRIDE * bin + 1] += (amplitude * im) as f32;
        }
    }

    fn strongest(peaks: &[Peak]) -> Peak {
        *peaks
            .iter()
            .max_by(|a, b| a.power.partial_cmp(&b.power).unwrap())
            .unwrap()
    }

    #[test]
    fn test_single_peak() {
        for frequency in [40.0, 41.0, 52.3] {
            let mut spectrum = empty_spectrum();
            add_partial(&mut spectrum, frequency, 100.0);
            let totals = PowerTotals::compute(&mut spectrum, WINDOW_SIZE);

            let mut peaks = Vec::with_capacity(20);
            find_peaks(&spectrum, WINDOW_SIZE, totals.power, 20, &mut peaks);
            assert!(!peaks.is_empty());
            let peak = strongest(&peaks);
            assert!((peak.frequency - frequency).abs() < 0.5);
            assert!((peak.loudness - peak.power.sqrt().sqrt()).abs() < 1e-6 * peak.loudness);
            assert!(peak.width >= 0.0);
        }
    }

    #[test]
    fn test_peak_count_limit() {
        let mut spectrum = empty_spectrum();
        for frequency in [20.0, 40.0, 60.0, 80.0] {
            add_partial(&mut spectrum, frequency, 100.0);
        }
        let totals = PowerTotals::compute(&mut spectrum, WINDOW_SIZE);

        let mut peaks = Vec::with_capacity(2);
        find_peaks(&spectrum, WINDOW_SIZE, totals.power, 2, &mut peaks);
        assert_eq!(peaks.len(), 2);
        assert!(peaks[0].frequency < peaks[1].frequency);
    }

    #[test]
    fn test_no_local_maxima() {
        // Power grows monotonically with frequency, so no bin is a peak
        let mut spectrum = empty_spectrum();
        for bin in MIN_BIN..WINDOW_SIZE - 2 {
            spectrum[BIN_STRIDE * bin + 2] = bin as f32;
        }
        let mut peaks = Vec::with_capacity(20);
        find_peaks(&spectrum, WINDOW_SIZE, 1000.0, 20, &mut peaks);
        assert!(peaks.is_empty());
    }

    fn plateau_spectrum() -> Vec<f32> {
        let mut spectrum = empty_spectrum();
        for bin in MIN_BIN..WINDOW_SIZE - 2 {
            spectrum[BIN_STRIDE * bin + 2] = 1.0;
        }
        spectrum
    }

    #[test]
    fn test_plateau_has_no_peaks() {
        let spectrum = plateau_spectrum();
        let mut peaks = Vec::with_capacity(20);
        find_peaks(&spectrum, WINDOW_SIZE, 0.05, 20, &mut peaks);
        assert!(peaks.is_empty());

        // A raised step is only a plateau on top
        let mut spectrum = plateau_spectrum();
        for bin in 30..40 {
            spectrum[BIN_STRIDE * bin + 2] = 5.0;
        }
        find_peaks(&spectrum, WINDOW_SIZE, 0.05, 20, &mut peaks);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_no_local_maxima_gives_no_pitch() {
        let mut ramp = empty_spectrum();
        for bin in MIN_BIN..WINDOW_SIZE - 2 {
            ramp[BIN_STRIDE * bin + 2] = bin as f32;
        }
        let total_power: f64 = 1.0e6;
        let total_loudness = libm::sqrt(libm::sqrt(total_power));

        for spectrum in [plateau_spectrum(), ramp] {
            let mut peaks = Vec::with_capacity(20);
            find_peaks(&spectrum, WINDOW_SIZE, total_power, 20, &mut peaks);
            assert!(peaks.is_empty());

            let mut histogram = Histogram::new(WINDOW_SIZE);
            histogram.accumulate(&peaks, total_loudness);
            assert!(histogram.bins().iter().all(|value| *value == 0.0));
            let result = match histogram.candidate() {
                Some(candidate) => {
                    estimate(&candidate, &peaks, total_power, 44100.0, WINDOW_SIZE)
                }
                None => PitchResult::NoPitch,
            };
            assert_eq!(result, PitchResult::NoPitch);
        }
    }

    #[test]
    fn test_undefined_width_is_rejected() {
        let mut spectrum = empty_spectrum();
        let bin = 20;
        spectrum[BIN_STRIDE * (bin - 1) + 2] = 5.0;
        spectrum[BIN_STRIDE * bin + 2] = 10.0;
        spectrum[BIN_STRIDE * (bin + 1) + 2] = 5.0;
        // Zero times infinity makes the frequency estimates NaN
        spectrum[BIN_STRIDE * bin] = f32::INFINITY;
        let mut peaks = Vec::with_capacity(20);
        find_peaks(&spectrum, WINDOW_SIZE, 20.0, 20, &mut peaks);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_silence() {
        let mut spectrum = empty_spectrum();
        let totals = PowerTotals::compute(&mut spectrum, WINDOW_SIZE);
        let mut peaks = Vec::with_capacity(20);
        find_peaks(&spectrum, WINDOW_SIZE, totals.power, 20, &mut peaks);
        assert!(peaks.is_empty());
    }
}
