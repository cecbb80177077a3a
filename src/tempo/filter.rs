use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type};

/// Q of the two second-order sections making up a 4th-order Butterworth
/// response: 1 / (2 cos(pi/8)) and 1 / (2 cos(3pi/8)).
const BUTTERWORTH_Q4: [f32; 2] = [0.541_196_1, 1.306_563];

/// 4th-order Butterworth high-pass, run forward over `samples`.
///
/// A cutoff that is non-positive or at/above Nyquist leaves the signal as is.
pub fn highpass_4th_order(samples: &[f32], cutoff_hz: f32, sample_rate: u32) -> Vec<f32> {
    let fs = sample_rate as f32;
    if sample_rate == 0 || !(cutoff_hz > 0.0) || cutoff_hz >= fs / 2.0 {
        log::debug!(
            "High-pass skipped: cutoff {:.1} Hz invalid for {} Hz audio",
            cutoff_hz,
            sample_rate
        );
        return samples.to_vec();
    }

    let mut sections = Vec::with_capacity(BUTTERWORTH_Q4.len());
    for q in BUTTERWORTH_Q4 {
        match Coefficients::<f32>::from_params(Type::HighPass, fs.hz(), cutoff_hz.hz(), q) {
            Ok(coeffs) => sections.push(DirectForm2Transposed::<f32>::new(coeffs)),
            Err(e) => {
                log::warn!("High-pass coefficients failed ({:?}), leaving signal unfiltered", e);
                return samples.to_vec();
            }
        }
    }

    samples
        .iter()
        .map(|&x| sections.iter_mut().fold(x, |acc, section| section.run(acc)))
        .collect()
}
