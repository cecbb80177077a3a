use super::decode::DecodedAudio;

const PEAK_EPSILON: f32 = 1e-10;

/// Mono, peak-normalized samples ready for tempo analysis.
#[derive(Clone, Debug)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Build from samples that are already mono.
    pub fn from_mono(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            samples: peak_normalize(samples.to_vec()),
            sample_rate,
        }
    }

    /// Build from interleaved frames of `channels` samples each.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Self {
        Self {
            samples: peak_normalize(downmix_interleaved(samples, channels)),
            sample_rate,
        }
    }

    /// Build from one buffer per channel.
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: u32) -> Self {
        Self {
            samples: peak_normalize(downmix_planar(channels)),
            sample_rate,
        }
    }

    pub fn from_decoded(audio: &DecodedAudio) -> Self {
        Self::from_interleaved(&audio.samples, audio.channels, audio.sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Keep only the first `len` samples.
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            samples: self.samples[..len.min(self.samples.len())].to_vec(),
            sample_rate: self.sample_rate,
        }
    }
}

fn downmix_interleaved(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn downmix_planar(channels: &[Vec<f32>]) -> Vec<f32> {
    match channels {
        [] => Vec::new(),
        [mono] => mono.clone(),
        _ => {
            // Ragged input is cut to the shortest channel
            let len = channels.iter().map(Vec::len).min().unwrap_or(0);
            (0..len)
                .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() / channels.len() as f32)
                .collect()
        }
    }
}

fn peak_normalize(mut samples: Vec<f32>) -> Vec<f32> {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    let scale = 1.0 / (peak + PEAK_EPSILON);
    for s in samples.iter_mut() {
        *s *= scale;
    }
    samples
}
