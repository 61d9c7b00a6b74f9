use super::spectrum::{BIN_STRIDE, MIN_BIN};

/// Scale from natural log power to the tracker's dB scale.
pub const DB_SCALE: f64 = 3.333;
/// Offset from the tracker's dB scale to dB relative to full scale.
pub const DB_OFFSET: f64 = -92.3;
/// The number of hops kept in the level history.
pub const HISTORY_LENGTH: usize = 20;
const INITIAL_LEVEL: f64 = -144.0;
const MIN_TOTAL_POWER: f64 = 1.0e-9;

/// Power and loudness summed over the refined spectrum of a hop.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PowerTotals {
    pub power: f64,
    /// The fourth root of the total power.
    pub loudness: f64,
    /// Level on the tracker's dB scale, never negative.
    pub db: f64,
}

impl PowerTotals {
    /// Computes the power of each refined bin, storing it in the bin's power
    /// slot, and sums it up. The power of a bin is the squared magnitude of
    /// its curvature relative to the bins two steps away.
    pub fn compute(refined: &mut [f32], window_size: usize) -> Self {
        let mut power = 0.0_f64;
        for i in (BIN_STRIDE * MIN_BIN..BIN_STRIDE * (window_size - 2)).step_by(BIN_STRIDE) {
            let re = refined[i] - 0.5 * (refined[i - 8] + refined[i + 8]);
            let im = refined[i + 1] - 0.5 * (refined[i - 7] + refined[i + 9]);
            let bin_power = re * re + im * im;
            refined[i + 2] = bin_power;
            power += bin_power as f64;
            refined[i + 3] = power as f32;
        }

        if power > MIN_TOTAL_POWER {
            let db = DB_SCALE * libm::log(power / window_size as f64);
            PowerTotals {
                power,
                loudness: libm::sqrt(libm::sqrt(power)),
                db: db.max(0.0),
            }
        } else {
            PowerTotals {
                power,
                loudness: 0.0,
                db: 0.0,
            }
        }
    }
}

/// Ring buffer of the dB levels of the most recent hops.
#[derive(Debug, Clone)]
pub struct LevelHistory {
    levels: [f64; HISTORY_LENGTH],
    index: usize,
}

impl Default for LevelHistory {
    fn default() -> Self {
        LevelHistory::new()
    }
}

impl LevelHistory {
    pub fn new() -> Self {
        LevelHistory {
            levels: [INITIAL_LEVEL; HISTORY_LENGTH],
            index: 0,
        }
    }

    /// Moves the write position to the next slot, which becomes the current one.
    pub fn advance(&mut self) {
        self.index += 1;
        if self.index == HISTORY_LENGTH {
            self.index = 0;
        }
    }

    /// Stores the level of a hop, given on the tracker's dB scale, in the
    /// current slot.
    pub fn record(&mut self, db: f64) {
        self.levels[self.index] = db + DB_OFFSET;
    }

    /// The level of the current slot in dB relative to full scale.
    pub fn current(&self) -> f64 {
        self.levels[self.index]
    }

    /// The linear amplitude of the current slot.
    pub fn amplitude(&self) -> f64 {
        libm::exp(self.current() / 20.0 * core::f64::consts::LN_10)
    }

    /// The stored levels, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=HISTORY_LENGTH).map(move |offset| self.levels[(self.index + offset) % HISTORY_LENGTH])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_silent_totals() {
        let window_size = 64;
        let mut refined = vec![0.0; BIN_STRIDE * window_size + 20];
        let totals = PowerTotals::compute(&mut refined, window_size);
        assert_eq!(totals, PowerTotals::default());
    }

    #[test]
    fn test_single_bin_totals() {
        let window_size = 64;
        let mut refined = vec![0.0; BIN_STRIDE * window_size + 20];
        // A single nonzero bin has curvature in itself and its two neighbours
        // two bins away
        refined[BIN_STRIDE * 20] = 1000.0;
        let totals = PowerTotals::compute(&mut refined, window_size);

        assert_eq!(refined[BIN_STRIDE * 20 + 2], 1.0e6);
        assert_eq!(refined[BIN_STRIDE * 18 + 2], 0.25e6);
        assert_eq!(refined[BIN_STRIDE * 22 + 2], 0.25e6);
        assert_eq!(refined[BIN_STRIDE * 19 + 2], 0.0);
        assert_eq!(totals.power, 1.5e6);
        // Running total
        assert_eq!(refined[BIN_STRIDE * 30 + 3], 1.5e6);

        let expected_db = 3.333 * (1.5e6_f64 / 64.0).ln();
        assert!((totals.db - expected_db).abs() < 1e-9);
        assert!((totals.loudness - 1.5e6_f64.powf(0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_level_history() {
        let mut history = LevelHistory::new();
        assert!(history.iter().all(|level| level == -144.0));
        for hop in 0..25 {
            history.advance();
            history.record(hop as f64);
        }
        assert_eq!(history.current(), 24.0 + DB_OFFSET);
        let levels: Vec<f64> = history.iter().collect();
        assert_eq!(levels.len(), HISTORY_LENGTH);
        assert_eq!(levels[0], 5.0 + DB_OFFSET);
        assert_eq!(levels[HISTORY_LENGTH - 1], 24.0 + DB_OFFSET);

        history.record(92.3);
        assert!((history.amplitude() - 1.0).abs() < 1e-9);
    }
}
