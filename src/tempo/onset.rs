use super::features::{Candidate, OnsetStrength, Peak, Source};
use super::spectrum::{autocorrelation, stft_magnitudes};
use crate::audio::prepare::Waveform;
use crate::config::TempoConfig;

/// Tempo from the periodicity of the onset-strength signal.
///
/// Returns the raw (unfolded) lag tempo, or `None` when the audio is too
/// short for the lag window, carries no onsets, or has no lag peak above
/// the threshold.
pub fn estimate(waveform: &Waveform, config: &TempoConfig) -> Option<Candidate> {
    if waveform.sample_rate() == 0 || config.hop_length == 0 {
        return None;
    }

    let onset = onset_strength(waveform, config);
    log::debug!(
        "Onset strength: {} frames at {:.2} frames/s",
        onset.values.len(),
        onset.frame_rate
    );

    let Some((min_lag, max_lag)) = lag_window(
        onset.frame_rate,
        onset.values.len(),
        config.min_bpm,
        config.max_bpm,
    ) else {
        log::debug!("Autocorrelation: degenerate lag window");
        return None;
    };

    let Some(acf) = autocorrelation(&onset.values) else {
        log::debug!("Autocorrelation: onset signal has no energy");
        return None;
    };

    let peaks = lag_peaks(&acf, min_lag, max_lag, config.acf_peak_threshold);
    let best = peaks.iter().copied().max_by(|a, b| a.value.total_cmp(&b.value))?;

    let bpm = 60.0 * onset.frame_rate / best.index as f32;
    log::debug!(
        "Autocorrelation: {} peaks in lags [{}, {}), best lag {} (acf {:.3}) -> {:.2} BPM",
        peaks.len(),
        min_lag,
        max_lag,
        best.index,
        best.value,
        bpm
    );

    Some(Candidate {
        bpm,
        source: Source::Autocorrelation,
    })
}

pub fn onset_strength(waveform: &Waveform, config: &TempoConfig) -> OnsetStrength {
    let frames = stft_magnitudes(waveform.samples(), config.frame_length, config.hop_length);
    let flux = spectral_flux(&frames);
    let smoothed = moving_average(&flux, config.smoothing_window);

    OnsetStrength {
        values: scale_to_unit(smoothed),
        frame_rate: waveform.sample_rate() as f32 / config.hop_length as f32,
    }
}

/// Sum over bins of the squared, half-wave rectified magnitude increase
/// between consecutive frames.
pub fn spectral_flux(frames: &[Vec<f32>]) -> Vec<f32> {
    frames
        .windows(2)
        .map(|pair| {
            pair[1]
                .iter()
                .zip(pair[0].iter())
                .map(|(cur, prev)| {
                    let rise = (cur - prev).max(0.0);
                    rise * rise
                })
                .sum()
        })
        .collect()
}

/// Centered moving average with zero padding; every output is divided by
/// the full window width.
pub fn moving_average(x: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 {
        return x.to_vec();
    }
    let left = window / 2;
    let right = (window - 1) / 2;
    let n = x.len();

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(left);
            let end = (i + right + 1).min(n);
            x[start..end].iter().sum::<f32>() / window as f32
        })
        .collect()
}

fn scale_to_unit(mut x: Vec<f32>) -> Vec<f32> {
    let max = x.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for v in x.iter_mut() {
            *v /= max;
        }
    }
    x
}

/// Lag range `[min_lag, max_lag)` matching `[min_bpm, max_bpm]` at the
/// given frame rate, or `None` when it is empty.
pub fn lag_window(frame_rate: f32, len: usize, min_bpm: f32, max_bpm: f32) -> Option<(usize, usize)> {
    if len == 0 || !(frame_rate > 0.0) || !(min_bpm > 0.0) || !(max_bpm > 0.0) {
        return None;
    }

    // Fastest tempo gives the shortest lag
    let min_lag = (frame_rate * 60.0 / max_bpm).floor() as usize;
    let max_lag = ((frame_rate * 60.0 / min_bpm).floor() as usize).min(len - 1);

    if min_lag >= max_lag {
        return None;
    }
    Some((min_lag, max_lag))
}

/// Values strictly above both neighbours and above `threshold`, where both
/// neighbours also lie inside `[min_lag, max_lag)`.
pub fn lag_peaks(acf: &[f32], min_lag: usize, max_lag: usize, threshold: f32) -> Vec<Peak> {
    let end = max_lag.min(acf.len());
    if end < min_lag + 3 {
        return Vec::new();
    }

    (min_lag + 1..end - 1)
        .filter(|&i| acf[i] > threshold && acf[i] > acf[i - 1] && acf[i] > acf[i + 1])
        .map(|i| Peak {
            index: i,
            value: acf[i],
        })
        .collect()
}
