use super::features::Candidate;
use crate::config::{default_max_bpm, default_min_bpm};

/// Fold `bpm` into the default 60-180 BPM band.
pub fn normalize(bpm: f32) -> Option<f32> {
    fold_into_range(bpm, default_min_bpm(), default_max_bpm())
}

/// Halve while above `max_bpm`, double while below `min_bpm`, then accept
/// only a result inside `[min_bpm, max_bpm]`.
///
/// Non-finite or non-positive tempos (and nonsensical ranges) are rejected
/// up front so the loops always terminate.
pub fn fold_into_range(bpm: f32, min_bpm: f32, max_bpm: f32) -> Option<f32> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }
    if !min_bpm.is_finite() || !max_bpm.is_finite() || min_bpm <= 0.0 || min_bpm >= max_bpm {
        return None;
    }

    let mut folded = bpm;
    while folded > max_bpm {
        folded /= 2.0;
    }
    while folded < min_bpm {
        folded *= 2.0;
    }

    (min_bpm..=max_bpm).contains(&folded).then_some(folded)
}

pub fn normalize_candidate(candidate: Option<Candidate>, min_bpm: f32, max_bpm: f32) -> Option<Candidate> {
    let candidate = candidate?;
    let bpm = fold_into_range(candidate.bpm, min_bpm, max_bpm);
    if bpm.is_none() {
        log::debug!(
            "{:?} candidate {:.2} BPM does not fold into [{}, {}]",
            candidate.source,
            candidate.bpm,
            min_bpm,
            max_bpm
        );
    }
    bpm.map(|bpm| Candidate { bpm, ..candidate })
}
