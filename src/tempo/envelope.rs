use super::features::{Candidate, Envelope, Peak, Source};
use super::filter::highpass_4th_order;
use super::spectrum::analytic_envelope;
use crate::audio::prepare::Waveform;
use crate::config::TempoConfig;

/// Tempo from the median spacing of transient peaks in the high-passed
/// amplitude envelope.
pub fn estimate(waveform: &Waveform, config: &TempoConfig) -> Option<Candidate> {
    if waveform.sample_rate() == 0 || waveform.is_empty() {
        return None;
    }

    let env = envelope(waveform, config);
    let min_spacing = ((config.min_peak_spacing_secs * env.rate).floor() as usize).max(1);
    let peaks = pick_peaks(&env.values, min_spacing);

    if peaks.len() < config.min_peaks {
        log::debug!(
            "Spectral: {} envelope peaks, need {}",
            peaks.len(),
            config.min_peaks
        );
        return None;
    }

    let intervals: Vec<f32> = peaks
        .windows(2)
        .map(|pair| (pair[1].index - pair[0].index) as f32 / env.rate)
        .filter(|&dt| dt >= config.min_interval_secs && dt <= config.max_interval_secs)
        .collect();

    if intervals.len() < config.min_intervals {
        log::debug!(
            "Spectral: {} usable intervals out of {}, need {}",
            intervals.len(),
            peaks.len().saturating_sub(1),
            config.min_intervals
        );
        return None;
    }

    let interval = median(&intervals)?;
    let bpm = 60.0 / interval;
    log::debug!(
        "Spectral: {} peaks, median interval {:.3}s -> {:.2} BPM",
        peaks.len(),
        interval,
        bpm
    );

    Some(Candidate {
        bpm,
        source: Source::Spectral,
    })
}

/// High-pass, take the analytic-signal magnitude, then block-average down
/// by `envelope_downsample`.
pub fn envelope(waveform: &Waveform, config: &TempoConfig) -> Envelope {
    let factor = config.envelope_downsample.max(1);
    let filtered = highpass_4th_order(waveform.samples(), config.highpass_cutoff_hz, waveform.sample_rate());
    let magnitude = analytic_envelope(&filtered);

    Envelope {
        values: magnitude
            .chunks(factor)
            .map(|block| block.iter().sum::<f32>() / block.len() as f32)
            .collect(),
        rate: waveform.sample_rate() as f32 / factor as f32,
    }
}

/// Local maxima above `mean + std`, taken left to right and skipping any
/// that fall within `min_spacing` samples of the last accepted one.
pub fn pick_peaks(values: &[f32], min_spacing: usize) -> Vec<Peak> {
    let n = values.len();
    if n < 3 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f32>() / n as f32;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n as f32;
    let threshold = mean + variance.sqrt();

    let mut peaks: Vec<Peak> = Vec::new();
    for i in 1..n - 1 {
        let v = values[i];
        // Strict on the left only, so a plateau counts at its first sample
        if v <= threshold || v <= values[i - 1] || v < values[i + 1] {
            continue;
        }
        let far_enough = peaks
            .last()
            .map_or(true, |last| i - last.index >= min_spacing);
        if far_enough {
            peaks.push(Peak { index: i, value: v });
        }
    }
    peaks
}

/// Median; the mean of the two middle values for an even count.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo::test_signals::{burst_train, click_train};

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert!((median(&[0.5, 0.4, 0.6, 0.7]).unwrap() - 0.55).abs() < 1e-6);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn peaks_need_threshold_and_spacing() {
        let mut values = vec![0.0f32; 40];
        for &i in &[5, 8, 20, 35] {
            values[i] = 1.0;
        }
        // 8 is only 3 samples after 5
        let peaks = pick_peaks(&values, 5);
        let idx: Vec<usize> = peaks.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![5, 20, 35]);

        let idx: Vec<usize> = pick_peaks(&values, 1).iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![5, 8, 20, 35]);
    }

    #[test]
    fn flat_signal_has_no_peaks() {
        assert!(pick_peaks(&[0.3; 100], 1).is_empty());
        assert!(pick_peaks(&[0.0; 100], 1).is_empty());
    }

    #[test]
    fn plateau_counts_once() {
        let values = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let idx: Vec<usize> = pick_peaks(&values, 1).iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![2]);
    }

    #[test]
    fn silence_gives_no_candidate() {
        let w = Waveform::from_mono(&vec![0.0; 22050 * 5], 22050);
        assert_eq!(estimate(&w, &TempoConfig::default()), None);
    }

    #[test]
    fn too_few_peaks_gives_no_candidate() {
        // Three clicks, one second apart
        let w = Waveform::from_mono(&click_train(60.0, 22050, 2.5), 22050);
        assert_eq!(estimate(&w, &TempoConfig::default()), None);
    }

    #[test]
    fn intervals_outside_range_are_dropped() {
        // Clicks every 0.25s give 240 BPM intervals, all below 0.3s
        let w = Waveform::from_mono(&click_train(240.0, 22050, 4.0), 22050);
        assert_eq!(estimate(&w, &TempoConfig::default()), None);
    }

    #[test]
    fn envelope_rate_tracks_downsampling() {
        let w = Waveform::from_mono(&click_train(120.0, 22050, 2.0), 22050);
        let env = envelope(&w, &TempoConfig::default());
        assert_eq!(env.values.len(), (44100 + 31) / 32);
        assert!((env.rate - 22050.0 / 32.0).abs() < 1e-3);
        assert!(env.values.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn finds_click_train_tempo() {
        let w = Waveform::from_mono(&click_train(120.0, 22050, 10.0), 22050);
        let c = estimate(&w, &TempoConfig::default()).unwrap();
        assert_eq!(c.source, Source::Spectral);
        assert!((c.bpm - 120.0).abs() <= 2.0, "got {}", c.bpm);
    }

    #[test]
    fn works_on_low_rate_audio() {
        // 256-sample period at 500 Hz = 0.512s, block aligned with the 32x decimation
        let w = Waveform::from_mono(&burst_train(256, 2000, 64, 150.0, 0.1, 500), 500);
        let c = estimate(&w, &TempoConfig::default()).unwrap();
        assert!((c.bpm - 60.0 / 0.512).abs() < 0.01, "got {}", c.bpm);
    }
}
