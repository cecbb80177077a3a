//! Synthetic rhythm fixtures shared by the tempo tests.

use std::f32::consts::PI;

/// Decaying sine bursts every `period` samples, starting at sample 0.
pub fn burst_train(
    period: usize,
    len: usize,
    burst_len: usize,
    carrier_hz: f32,
    decay_secs: f32,
    sample_rate: u32,
) -> Vec<f32> {
    let mut out = vec![0.0f32; len];
    let mut onset = 0;
    while onset < len {
        write_burst(&mut out, onset, burst_len, carrier_hz, decay_secs, sample_rate);
        onset += period;
    }
    out
}

/// 20 ms, 1 kHz clicks at `bpm`, `secs` long. Onsets are rounded to the
/// nearest sample so non-integer periods do not drift.
pub fn click_train(bpm: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
    let len = (secs * sample_rate as f32).round() as usize;
    let period_secs = 60.0 / bpm as f64;
    let burst_len = (0.02 * sample_rate as f32) as usize;

    let mut out = vec![0.0f32; len];
    let mut beat = 0u32;
    loop {
        let onset = (beat as f64 * period_secs * sample_rate as f64).round() as usize;
        if onset >= len {
            break;
        }
        write_burst(&mut out, onset, burst_len, 1000.0, 0.005, sample_rate);
        beat += 1;
    }
    out
}

fn write_burst(
    out: &mut [f32],
    onset: usize,
    burst_len: usize,
    carrier_hz: f32,
    decay_secs: f32,
    sample_rate: u32,
) {
    let end = (onset + burst_len).min(out.len());
    for (i, slot) in out[onset..end].iter_mut().enumerate() {
        let t = i as f32 / sample_rate as f32;
        *slot = 0.9 * (2.0 * PI * carrier_hz * t).sin() * (-t / decay_secs).exp();
    }
}
