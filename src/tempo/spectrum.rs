use rustfft::{num_complex::Complex, FftPlanner};

const EPSILON: f32 = 1e-10;

/// Periodic Hann window, the STFT analysis convention.
pub fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}

/// Hann-windowed magnitude spectra (`frame_length / 2 + 1` bins each), one per
/// hop. Only frames that fit entirely inside `samples` are produced.
pub fn stft_magnitudes(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<Vec<f32>> {
    if frame_length == 0 || hop_length == 0 || samples.len() < frame_length {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_length);
    let hann = hann_window(frame_length);
    let bins = frame_length / 2 + 1;

    let mut frames = Vec::with_capacity((samples.len() - frame_length) / hop_length + 1);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_length];

    let mut pos = 0;
    while pos + frame_length <= samples.len() {
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(samples[pos + i] * hann[i], 0.0);
        }
        fft.process(&mut buffer);
        frames.push(buffer[..bins].iter().map(|c| c.norm()).collect());
        pos += hop_length;
    }

    frames
}

/// Autocorrelation over non-negative lags, scaled so lag 0 is 1.0.
///
/// Returns `None` for an empty or zero-energy signal, where the scaling is
/// undefined.
pub fn autocorrelation(signal: &[f32]) -> Option<Vec<f32>> {
    let n = signal.len();
    if n == 0 {
        return None;
    }

    // Zero-pad past 2n - 1 so the circular correlation equals the linear one
    let size = (2 * n).next_power_of_two();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(size);
    let ifft = planner.plan_fft_inverse(size);

    let mut buffer = vec![Complex::new(0.0f32, 0.0); size];
    for (slot, &x) in buffer.iter_mut().zip(signal) {
        slot.re = x;
    }
    fft.process(&mut buffer);
    for v in buffer.iter_mut() {
        *v = Complex::new(v.norm_sqr(), 0.0);
    }
    ifft.process(&mut buffer);

    let zero_lag = buffer[0].re;
    if zero_lag <= EPSILON * size as f32 {
        return None;
    }
    Some(buffer[..n].iter().map(|c| c.re / zero_lag).collect())
}

/// Magnitude of the analytic signal (Hilbert construction).
pub fn analytic_envelope(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    // Keep DC (and Nyquist for even n), double positive frequencies, drop negative ones
    let half = n / 2;
    for (k, v) in buffer.iter_mut().enumerate() {
        let gain = if k == 0 || (n % 2 == 0 && k == half) {
            1.0
        } else if k < (n + 1) / 2 {
            2.0
        } else {
            0.0
        };
        *v *= gain;
    }
    ifft.process(&mut buffer);

    let scale = 1.0 / n as f32;
    buffer.iter().map(|c| c.norm() * scale).collect()
}
