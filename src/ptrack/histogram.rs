use alloc::{boxed::Box, vec};

use super::peaks::Peak;

pub const BINS_PER_OCTAVE: usize = 48;
/// Histogram bins per natural log unit of frequency, `48 / ln(2)`.
pub const BINS_PER_LOG: f64 = 69.24936196;
/// Histogram bin 0 corresponds to this many bins above a frequency of one
/// refined bin.
pub const BIN_OFFSET: f64 = 96.0;
/// Converts a relative peak width to histogram bins.
const WIDTH_TO_BINS: f64 = 4.0 / 0.0145453;
/// Contributions may start this many bins below bin 0.
const HISTOGRAM_GUARD: i64 = 10;
const SCORE_SCALE: f64 = 30.0;
const LOUDNESS_WEIGHT: f64 = 4.0;
/// Added to the zero based harmonic index when weighting a contribution.
const HARMONIC_WEIGHT_OFFSET: f64 = 7.0;

/// Offsets in histogram bins from the fundamental to harmonics 1 to 16,
/// `48 * log2(h)`.
pub const HARMONIC_OFFSETS: [f64; 16] = [
    0.0,
    48.0,
    76.0782000346154967102,
    96.0,
    111.45254855459339269887,
    124.07820003461549671089,
    134.75303625876499715823,
    144.0,
    152.15640006923099342109,
    159.45254855459339269887,
    166.05271769459026829915,
    172.07820003461549671088,
    177.62110647077242370064,
    182.75303625876499715892,
    187.53074858920888940907,
    192.0,
];

/// The highest scoring histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramCandidate {
    pub bin: usize,
    pub value: f32,
}

impl HistogramCandidate {
    /// The candidate fundamental in refined bins.
    pub fn frequency_in_bins(&self) -> f64 {
        libm::exp((self.bin as f64 + BIN_OFFSET) / BINS_PER_LOG)
    }
}

/// Scores candidate fundamentals on a log frequency axis with 48 bins per
/// octave. Every peak votes for the fundamentals it could be harmonic 1 to 16
/// of, with a parabolic bump as wide as the peak.
pub struct Histogram {
    bins: Box<[f32]>,
}

/// The number of histogram bins for a given window size.
pub fn bin_count(window_size: usize) -> usize {
    BINS_PER_OCTAVE * (window_size.trailing_zeros() as usize - 2)
}

impl Histogram {
    pub fn new(window_size: usize) -> Self {
        if window_size < 8 || !window_size.is_power_of_two() {
            panic!("Window size must be a power of two of at least 8")
        }
        Histogram {
            bins: vec![0.; bin_count(window_size)].into_boxed_slice(),
        }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn clear(&mut self) {
        self.bins.fill(0.0);
    }

    /// Clears the histogram and adds the votes of `peaks`.
    pub fn accumulate(&mut self, peaks: &[Peak], total_loudness: f64) {
        self.clear();
        let bin_count = self.bins.len() as i64;

        for peak in peaks {
            let pitch = BINS_PER_LOG * libm::log(peak.frequency) - BIN_OFFSET;
            let bandwidth = WIDTH_TO_BINS * peak.width / peak.frequency;
            let put_bandwidth = if bandwidth < 2.0 { 2.0 } else { bandwidth };
            let weight_bandwidth = if bandwidth < 1.0 { 1.0 } else { bandwidth };
            let weight = LOUDNESS_WEIGHT * peak.loudness / total_loudness;

            for (index, offset) in HARMONIC_OFFSETS.iter().enumerate() {
                let bin = pitch - offset;
                if bin >= bin_count as f64 {
                    continue;
                }
                let first_bin = (bin + 0.5 - 0.5 * put_bandwidth) as i64;
                if first_bin < -HISTOGRAM_GUARD {
                    continue;
                }
                let last_bin = (bin + 0.5 + 0.5 * put_bandwidth) as i64;

                let score = (SCORE_SCALE * weight
                    / ((index as f64 + HARMONIC_WEIGHT_OFFSET) * weight_bandwidth))
                    as f32;
                let para = (1.0 / (put_bandwidth * put_bandwidth)) as f32;
                let mut phase = first_bin as f32 - bin as f32;
                for k in first_bin..=last_bin {
                    if (0..bin_count).contains(&k) {
                        self.bins[k as usize] += score * (1.0 - para * phase * phase);
                    }
                    phase += 1.0;
                }
            }
        }
    }

    /// The first bin with the highest value, or `None` if no bin is positive.
    pub fn candidate(&self) -> Option<HistogramCandidate> {
        let mut best: Option<HistogramCandidate> = None;
        for (bin, value) in self.bins.iter().enumerate() {
            let is_better = match best {
                Some(candidate) => *value > candidate.value,
                None => *value > 0.0,
            };
            if is_better {
                best = Some(HistogramCandidate { bin, value: *value });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn peak(frequency: f64, power: f64) -> Peak {
        Peak {
            frequency,
            width: 0.01,
            power,
            loudness: power.sqrt().sqrt(),
        }
    }

    #[test]
    fn test_bin_count() {
        assert_eq!(bin_count(2048), 48 * 9);
        assert_eq!(Histogram::new(16).bins().len(), 96);
    }

    #[test]
    fn test_harmonic_offsets() {
        for (index, offset) in HARMONIC_OFFSETS.iter().enumerate() {
            let expected = 48.0 * ((index + 1) as f64).log2();
            assert!((offset - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_histogram() {
        let mut histogram = Histogram::new(1024);
        histogram.accumulate(&[], 1.0);
        assert!(histogram.bins().iter().all(|value| *value == 0.0));
        assert_eq!(histogram.candidate(), None);
    }

    #[test]
    fn test_harmonic_series() {
        let fundamental = 20.0;
        let peaks: Vec<Peak> = (1..=6)
            .map(|h| peak(fundamental * h as f64, 1000.0))
            .collect();
        let total_loudness: f64 = peaks.iter().map(|p| p.loudness).sum();

        let mut histogram = Histogram::new(2048);
        histogram.accumulate(&peaks, total_loudness);
        let candidate = histogram.candidate().unwrap();
        let frequency = candidate.frequency_in_bins();
        // Within a histogram bin of the fundamental
        assert!((frequency / fundamental - 1.0).abs() < 0.015);
    }

    #[test]
    fn test_first_maximum_wins() {
        let mut histogram = Histogram::new(64);
        histogram.bins[3] = 2.0;
        histogram.bins[7] = 2.0;
        histogram.bins[5] = 1.0;
        assert_eq!(
            histogram.candidate(),
            Some(HistogramCandidate { bin: 3, value: 2.0 })
        );
    }

    #[test]
    fn test_contributions_outside_range_are_dropped() {
        // A single peak far above the histogram range, only its high
        // harmonics land inside
        let mut histogram = Histogram::new(64);
        let peaks = [peak(400.0, 1.0)];
        histogram.accumulate(&peaks, peaks[0].loudness);
        assert_eq!(histogram.bins().len(), 192);
        assert!(histogram.bins().iter().all(|value| value.is_finite()));
        assert!(histogram.bins().iter().any(|value| *value > 0.0));
        // The seventh harmonic is the lowest one in range
        let candidate = histogram.candidate().unwrap();
        assert!(candidate.bin > 120);
    }
}
