use crate::common::HopBuffer;
use crate::ptrack::config::PTrackConfig;
use crate::ptrack::result::PitchResult;
use crate::ptrack::tracker::PitchTracker;
use crate::ConfigError;

/// Runs a [`PitchTracker`] on a stream of input chunks of arbitrary size.
pub struct PitchDetector {
    hop_buffer: HopBuffer,
    tracker: PitchTracker,
    processed_hop_count: usize,
}

impl PitchDetector {
    pub fn new(sample_rate: f32, hop_size: usize, peak_count: usize) -> Result<Self, ConfigError> {
        PitchDetector::from_config(&PTrackConfig::new(sample_rate, hop_size, peak_count))
    }

    pub fn from_config(config: &PTrackConfig) -> Result<Self, ConfigError> {
        let tracker = PitchTracker::from_config(config)?;
        Ok(PitchDetector {
            hop_buffer: HopBuffer::new(config.hop_size),
            tracker,
            processed_hop_count: 0,
        })
    }

    /// Consumes `buffer`, calling `result_handler` once for every hop that
    /// gets filled and analyzed.
    pub fn process<F>(&mut self, buffer: &[f32], mut result_handler: F)
    where
        F: FnMut(&PitchResult),
    {
        let tracker = &mut self.tracker;
        let processed_hop_count = &mut self.processed_hop_count;
        self.hop_buffer.process(buffer, |hop| {
            let result = tracker.process_hop(hop);
            *processed_hop_count += 1;
            result_handler(&result);
        });
    }

    /// Discards buffered samples and resets the tracker.
    pub fn reset(&mut self) {
        self.hop_buffer.reset();
        self.tracker.reset();
        self.processed_hop_count = 0;
    }

    /// Returns the most recently computed pitch detection result.
    pub fn result(&self) -> PitchResult {
        self.tracker.result()
    }

    /// The tracker doing the analysis, for access to levels and intermediate results.
    pub fn tracker(&self) -> &PitchTracker {
        &self.tracker
    }

    /// Returns the number of processed hops since the detector was created.
    pub fn processed_hop_count(&self) -> usize {
        self.processed_hop_count
    }

    pub fn hop_size(&self) -> usize {
        self.tracker.hop_size()
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.tracker.sample_rate()
    }
}
