use super::histogram::HistogramCandidate;
use super::level::DB_SCALE;
use super::peaks::Peak;
use super::result::PitchResult;

/// Highest harmonic number a peak can be matched to.
const MAX_HARMONIC: i64 = 16;
/// Largest relative deviation of a peak from an exact harmonic.
const MAX_DEVIATION: f64 = 0.023;
/// Peak widths are clamped to at least this when weighting.
const MIN_WIDTH: f64 = 0.03;
/// Harmonics below this number count as low harmonics.
const LOW_HARMONIC_LIMIT: i64 = 8;
const MIN_LOW_HARMONICS: usize = 4;
const MIN_HARMONICS: usize = 7;
/// Sparse harmonic series are accepted if they carry this share of the total power.
const MIN_POWER_SHARE: f64 = 0.01;
/// Fundamentals below this many refined bins are rejected.
const MIN_FREQUENCY_IN_BINS: f64 = 5.0;

/// Sums over the peaks that are harmonics of a candidate fundamental.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HarmonicSums {
    pub harmonic_count: usize,
    pub low_harmonic_count: usize,
    pub power: f64,
    pub loudness: f64,
    /// Sum of weighted fundamental estimates, in refined bins.
    pub weighted_frequency: f64,
    pub weight: f64,
}

impl HarmonicSums {
    /// Matches `peaks` against the harmonics of `candidate`. Each peak close
    /// enough to a harmonic contributes an estimate of the fundamental,
    /// weighted by the inverse square of its width times its harmonic number.
    pub fn collect(candidate: &HistogramCandidate, peaks: &[Peak]) -> Self {
        let fundamental = candidate.frequency_in_bins();
        let mut sums = HarmonicSums::default();

        for peak in peaks {
            let ratio = peak.frequency / fundamental;
            let harmonic = (ratio + 0.5) as i64;
            if !(1..=MAX_HARMONIC).contains(&harmonic) {
                continue;
            }
            let harmonic_f = harmonic as f64;
            let deviation = 1.0 - ratio / harmonic_f;
            if deviation.abs() >= MAX_DEVIATION {
                continue;
            }

            sums.harmonic_count += 1;
            if harmonic < LOW_HARMONIC_LIMIT {
                sums.low_harmonic_count += 1;
            }
            sums.power += peak.power;
            sums.loudness += peak.loudness;
            let width = if peak.width > MIN_WIDTH {
                peak.width
            } else {
                MIN_WIDTH
            };
            let weight = 1.0 / ((width * harmonic_f) * (width * harmonic_f));
            sums.weight += weight;
            sums.weighted_frequency += weight * peak.frequency / harmonic_f;
        }
        sums
    }

    /// The weighted fundamental estimate in refined bins.
    pub fn frequency_in_bins(&self) -> f64 {
        self.weighted_frequency / self.weight
    }
}

/// Turns the peaks agreeing with `candidate` into a pitch estimate, or
/// rejects it if the harmonic evidence is too weak.
pub fn estimate(
    candidate: &HistogramCandidate,
    peaks: &[Peak],
    total_power: f64,
    sample_rate: f64,
    window_size: usize,
) -> PitchResult {
    let sums = HarmonicSums::collect(candidate, peaks);

    if (sums.low_harmonic_count < MIN_LOW_HARMONICS || sums.harmonic_count < MIN_HARMONICS)
        && sums.power < MIN_POWER_SHARE * total_power
    {
        return PitchResult::NoPitch;
    }

    let frequency_in_bins = sums.frequency_in_bins();
    // Also rejects a NaN estimate when no peak matched
    if !(frequency_in_bins >= MIN_FREQUENCY_IN_BINS) {
        return PitchResult::NoPitch;
    }

    let hz_per_bin = sample_rate / (2 * window_size) as f64;
    let loudness_squared = sums.loudness * sums.loudness;
    let loudness = DB_SCALE * libm::log(loudness_squared * loudness_squared / window_size as f64);

    PitchResult::Pitch {
        frequency: (hz_per_bin * frequency_in_bins) as f32,
        loudness: loudness as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptrack::histogram::{BINS_PER_LOG, BIN_OFFSET};
    use alloc::vec::Vec;

    fn candidate_for(frequency_in_bins: f64) -> HistogramCandidate {
        let bin = (BINS_PER_LOG * frequency_in_bins.ln() - BIN_OFFSET).round() as usize;
        HistogramCandidate { bin, value: 1.0 }
    }

    fn harmonic_peaks(fundamental: f64, count: usize) -> Vec<Peak> {
        (1..=count)
            .map(|h| Peak {
                frequency: fundamental * h as f64,
                width: 0.05,
                power: 1000.0,
                loudness: 1000.0_f64.sqrt().sqrt(),
            })
            .collect()
    }

    #[test]
    fn test_full_harmonic_series() {
        let fundamental = 40.9;
        let peaks = harmonic_peaks(fundamental, 8);
        let total_power = 8000.0;
        let window_size = 2048;
        let result = estimate(
            &candidate_for(fundamental),
            &peaks,
            total_power,
            44100.0,
            window_size,
        );

        let expected_hz = fundamental * 44100.0 / 4096.0;
        let frequency = result.frequency().unwrap() as f64;
        assert!((frequency - expected_hz).abs() < 1e-3 * expected_hz);

        let summed_loudness = 8.0 * 1000.0_f64.sqrt().sqrt();
        let expected_loudness = 3.333 * (summed_loudness.powi(4) / 2048.0).ln();
        assert!((result.loudness().unwrap() as f64 - expected_loudness).abs() < 1e-3);
    }

    #[test]
    fn test_sparse_but_dominant_series() {
        // Too few harmonics, but they carry most of the power
        let peaks = harmonic_peaks(30.0, 2);
        let result = estimate(&candidate_for(30.0), &peaks, 2100.0, 44100.0, 1024);
        assert!(result.is_pitched());
    }

    #[test]
    fn test_sparse_and_weak_series() {
        let peaks = harmonic_peaks(30.0, 2);
        let result = estimate(&candidate_for(30.0), &peaks, 1.0e6, 44100.0, 1024);
        assert_eq!(result, PitchResult::NoPitch);
    }

    #[test]
    fn test_inharmonic_peaks_are_ignored() {
        let mut peaks = harmonic_peaks(30.0, 8);
        // Halfway between harmonics 2 and 3
        peaks.push(Peak {
            frequency: 75.0,
            width: 0.05,
            power: 5000.0,
            loudness: 5000.0_f64.sqrt().sqrt(),
        });
        let sums = HarmonicSums::collect(&candidate_for(30.0), &peaks);
        assert_eq!(sums.harmonic_count, 8);
        assert_eq!(sums.low_harmonic_count, 7);
        assert_eq!(sums.power, 8000.0);
    }

    #[test]
    fn test_fundamental_too_low() {
        let peaks = harmonic_peaks(4.5, 8);
        let result = estimate(&candidate_for(4.5), &peaks, 8000.0, 44100.0, 1024);
        assert_eq!(result, PitchResult::NoPitch);
    }

    #[test]
    fn test_no_matching_peaks() {
        let result = estimate(&candidate_for(30.0), &[], 1.0, 44100.0, 1024);
        assert_eq!(result, PitchResult::NoPitch);
    }
}
