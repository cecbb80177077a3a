use super::features::{Candidate, TempoEstimate};
use super::fold::normalize_candidate;

/// Fold both candidates and keep the autocorrelation one when it survives,
/// otherwise the spectral one.
pub fn select(
    autocorrelation: Option<Candidate>,
    spectral: Option<Candidate>,
    duration_secs: f32,
    min_bpm: f32,
    max_bpm: f32,
) -> TempoEstimate {
    let chosen = normalize_candidate(autocorrelation, min_bpm, max_bpm)
        .or_else(|| normalize_candidate(spectral, min_bpm, max_bpm));

    match chosen {
        Some(candidate) => TempoEstimate {
            bpm: Some(candidate.bpm),
            beat_count: beat_count(candidate.bpm, duration_secs),
            source: Some(candidate.source),
            duration_secs,
        },
        None => TempoEstimate::undetected(duration_secs),
    }
}

/// Beats a steady `bpm` would produce over `duration_secs`, rounded.
pub fn beat_count(bpm: f32, duration_secs: f32) -> u32 {
    if !(bpm > 0.0) || !(duration_secs > 0.0) {
        return 0;
    }
    (bpm / 60.0 * duration_secs).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo::features::Source;

    fn acf(bpm: f32) -> Option<Candidate> {
        Some(Candidate { bpm, source: Source::Autocorrelation })
    }

    fn spectral(bpm: f32) -> Option<Candidate> {
        Some(Candidate { bpm, source: Source::Spectral })
    }

    #[test]
    fn autocorrelation_wins_when_valid() {
        let est = select(acf(240.0), spectral(100.0), 10.0, 60.0, 180.0);
        assert_eq!(est.bpm, Some(120.0));
        assert_eq!(est.source, Some(Source::Autocorrelation));
        assert_eq!(est.beat_count, 20);
    }

    #[test]
    fn spectral_is_the_fallback() {
        let est = select(None, spectral(45.0), 10.0, 60.0, 180.0);
        assert_eq!(est.bpm, Some(90.0));
        assert_eq!(est.source, Some(Source::Spectral));
        assert_eq!(est.beat_count, 15);
    }

    #[test]
    fn rejected_autocorrelation_falls_back() {
        let est = select(acf(-3.0), spectral(100.0), 6.0, 60.0, 180.0);
        assert_eq!(est.bpm, Some(100.0));
        assert_eq!(est.source, Some(Source::Spectral));
    }

    #[test]
    fn nothing_detected() {
        let est = select(None, None, 30.0, 60.0, 180.0);
        assert_eq!(est, TempoEstimate::undetected(30.0));
        assert_eq!(est.beat_count, 0);
        assert!(!est.is_detected());
    }

    #[test]
    fn beat_count_is_duration_based() {
        assert_eq!(beat_count(120.0, 10.0), 20);
        assert_eq!(beat_count(90.0, 61.0), 92); // 91.5 rounds up
        assert_eq!(beat_count(100.0, 0.0), 0);
        assert_eq!(beat_count(f32::NAN, 10.0), 0);
    }
}
