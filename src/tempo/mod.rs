pub mod envelope;
pub mod features;
pub mod filter;
pub mod fold;
pub mod onset;
pub mod select;
pub mod spectrum;

#[cfg(test)]
pub(crate) mod test_signals;

use crate::audio::prepare::Waveform;
use crate::config::TempoConfig;
use features::TempoEstimate;

/// Runs both estimators over a prepared waveform and picks one tempo.
///
/// Holds only parameters; every `detect` call is independent, so one
/// detector can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct TempoDetector {
    config: TempoConfig,
}

impl TempoDetector {
    pub fn new(config: TempoConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, waveform: &Waveform) -> TempoEstimate {
        let duration = waveform.duration_secs();
        if waveform.is_empty() || waveform.sample_rate() == 0 {
            log::debug!("Empty waveform, nothing to analyze");
            return TempoEstimate::undetected(duration);
        }

        let autocorrelation = onset::estimate(waveform, &self.config);
        let spectral = envelope::estimate(waveform, &self.config);
        log::debug!(
            "Raw candidates: autocorrelation={:?}, spectral={:?}",
            autocorrelation.map(|c| c.bpm),
            spectral.map(|c| c.bpm)
        );

        let estimate = select::select(
            autocorrelation,
            spectral,
            duration,
            self.config.min_bpm,
            self.config.max_bpm,
        );

        match (estimate.bpm, estimate.source) {
            (Some(bpm), Some(source)) => log::debug!(
                "Tempo {:.1} BPM from {:?}, ~{} beats in {:.1}s",
                bpm,
                source,
                estimate.beat_count,
                duration
            ),
            _ => log::debug!("No tempo detected in {:.1}s of audio", duration),
        }
        estimate
    }
}

/// Estimate the tempo of mono `samples` with the default parameters.
pub fn estimate_tempo(samples: &[f32], sample_rate: u32) -> TempoEstimate {
    TempoDetector::default().detect(&Waveform::from_mono(samples, sample_rate))
}
