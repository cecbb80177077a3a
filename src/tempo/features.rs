use serde::Serialize;

/// Which estimator produced a tempo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Autocorrelation,
    Spectral,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub bpm: f32,
    pub source: Source,
}

/// Local maximum of a signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub value: f32,
}

/// Per-frame spectral flux, smoothed and scaled to [0, 1].
#[derive(Clone, Debug)]
pub struct OnsetStrength {
    pub values: Vec<f32>,
    /// Frames per second (sample_rate / hop_length)
    pub frame_rate: f32,
}

/// Downsampled amplitude envelope.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub values: Vec<f32>,
    /// Envelope samples per second
    pub rate: f32,
}

/// Final answer of a detection run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TempoEstimate {
    /// Dominant tempo, absent when neither estimator was confident
    pub bpm: Option<f32>,
    /// Beats implied by `bpm` over the whole duration, not counted onsets
    pub beat_count: u32,
    pub source: Option<Source>,
    pub duration_secs: f32,
}

impl TempoEstimate {
    pub fn undetected(duration_secs: f32) -> Self {
        Self {
            bpm: None,
            beat_count: 0,
            source: None,
            duration_secs,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.bpm.is_some()
    }
}
