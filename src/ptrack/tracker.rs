use alloc::{boxed::Box, vec, vec::Vec};

use log::{debug, trace};

use super::config::PTrackConfig;
use super::consensus;
use super::histogram::{Histogram, HistogramCandidate};
use super::level::{LevelHistory, PowerTotals};
use super::peaks::{find_peaks, Peak};
use super::result::PitchResult;
use super::spectrum::SpectrumBuilder;
use crate::ConfigError;

/// Analyzes consecutive hops of samples, producing a pitch estimate per hop.
///
/// All buffers are allocated on creation; [`process_hop`](Self::process_hop)
/// does not allocate. The spectrum of a hop is interpolated using the previous
/// hop, so the first result after creation or [`reset`](Self::reset) is based
/// on a half empty window.
pub struct PitchTracker {
    config: PTrackConfig,
    signal: Box<[f32]>,
    spectrum: SpectrumBuilder,
    totals: PowerTotals,
    levels: LevelHistory,
    peaks: Vec<Peak>,
    histogram: Histogram,
    candidate: Option<HistogramCandidate>,
    result: PitchResult,
}

impl PitchTracker {
    /// Creates a tracker with the default amplitude threshold and input gain.
    pub fn new(sample_rate: f32, hop_size: usize, peak_count: usize) -> Result<Self, ConfigError> {
        PitchTracker::from_config(&PTrackConfig::new(sample_rate, hop_size, peak_count))
    }

    pub fn from_config(config: &PTrackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "Creating pitch tracker: {} Hz, hop size {}, {} peaks, threshold {} dB",
            config.sample_rate, config.hop_size, config.peak_count, config.amplitude_threshold_db
        );

        let window_size = config.window_size();
        Ok(PitchTracker {
            config: config.clone(),
            signal: vec![0.; config.hop_size].into_boxed_slice(),
            spectrum: SpectrumBuilder::new(config.hop_size),
            totals: PowerTotals::default(),
            levels: LevelHistory::new(),
            peaks: Vec::with_capacity(config.peak_count),
            histogram: Histogram::new(window_size),
            candidate: None,
            result: PitchResult::NoPitch,
        })
    }

    /// Analyzes a hop of exactly [`hop_size`](Self::hop_size) samples.
    pub fn process_hop(&mut self, hop: &[f32]) -> PitchResult {
        assert_eq!(
            hop.len(),
            self.config.hop_size,
            "Hop must hold exactly {} samples",
            self.config.hop_size
        );
        let gain = self.config.input_gain;
        for (target, sample) in self.signal.iter_mut().zip(hop.iter()) {
            *target = sample * gain;
        }

        self.levels.advance();
        self.spectrum.build(&self.signal);
        let window_size = self.window_size();
        self.totals = PowerTotals::compute(self.spectrum.refined_mut(), window_size);
        self.levels.record(self.totals.db);

        self.peaks.clear();
        self.histogram.clear();
        self.candidate = None;
        self.result = if self.totals.db >= self.config.amplitude_threshold_db as f64 {
            self.analyze()
        } else {
            PitchResult::NoPitch
        };

        trace!(
            "Hop level {:.1} dB, {} peaks, {:?}",
            self.totals.db,
            self.peaks.len(),
            self.result
        );
        self.result
    }

    fn analyze(&mut self) -> PitchResult {
        let window_size = self.window_size();
        find_peaks(
            self.spectrum.refined(),
            window_size,
            self.totals.power,
            self.config.peak_count,
            &mut self.peaks,
        );
        self.histogram.accumulate(&self.peaks, self.totals.loudness);
        self.candidate = self.histogram.candidate();

        match self.candidate {
            Some(candidate) => consensus::estimate(
                &candidate,
                &self.peaks,
                self.totals.power,
                self.config.sample_rate as f64,
                window_size,
            ),
            None => PitchResult::NoPitch,
        }
    }

    /// Forgets all previously processed hops.
    pub fn reset(&mut self) {
        self.spectrum.reset();
        self.totals = PowerTotals::default();
        self.levels = LevelHistory::new();
        self.peaks.clear();
        self.histogram.clear();
        self.candidate = None;
        self.result = PitchResult::NoPitch;
    }

    /// Returns the result of the most recently processed hop.
    pub fn result(&self) -> PitchResult {
        self.result
    }

    /// The level of the most recent hop in dB relative to full scale, as
    /// stored in the level history.
    pub fn level_db(&self) -> f32 {
        self.levels.current() as f32
    }

    /// The linear amplitude of the most recent hop.
    pub fn amplitude(&self) -> f32 {
        self.levels.amplitude() as f32
    }

    /// The levels of the last 20 hops in dB relative to full scale, oldest first.
    pub fn level_history(&self) -> impl Iterator<Item = f32> + '_ {
        self.levels.iter().map(|level| level as f32)
    }

    /// The power totals of the most recent hop.
    pub fn power_totals(&self) -> &PowerTotals {
        &self.totals
    }

    /// The spectral peaks of the most recent hop. Empty if the hop was too quiet.
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// The pitch histogram of the most recent hop.
    pub fn histogram(&self) -> &[f32] {
        self.histogram.bins()
    }

    /// The best histogram bin of the most recent hop.
    pub fn candidate(&self) -> Option<HistogramCandidate> {
        self.candidate
    }

    /// The refined spectrum of the most recent hop, see [`SpectrumBuilder`].
    pub fn spectrum(&self) -> &[f32] {
        self.spectrum.refined()
    }

    pub fn config(&self) -> &PTrackConfig {
        &self.config
    }

    pub fn hop_size(&self) -> usize {
        self.config.hop_size
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size()
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }
}
