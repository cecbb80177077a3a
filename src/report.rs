use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::tempo::features::{Source, TempoEstimate};

/// Qualitative tempo band shown next to the number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoCategory {
    VerySlow,
    Slow,
    Moderate,
    Fast,
    VeryFast,
}

impl TempoCategory {
    pub fn from_bpm(bpm: f32) -> Self {
        if bpm < 60.0 {
            Self::VerySlow
        } else if bpm < 90.0 {
            Self::Slow
        } else if bpm < 120.0 {
            Self::Moderate
        } else if bpm < 140.0 {
            Self::Fast
        } else {
            Self::VeryFast
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VerySlow => "Very Slow (Ballad)",
            Self::Slow => "Slow (Folk/Blues)",
            Self::Moderate => "Moderate (Pop/Rock)",
            Self::Fast => "Fast (Dance/Electronic)",
            Self::VeryFast => "Very Fast (Drum & Bass/Hardcore)",
        }
    }
}

impl fmt::Display for TempoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What gets printed for one analyzed file.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub bpm: Option<f32>,
    pub beat_count: u32,
    pub category: Option<TempoCategory>,
    pub source: Option<Source>,
    pub duration_secs: f32,
}

impl FileReport {
    pub fn new(path: &Path, estimate: &TempoEstimate) -> Self {
        Self {
            file: display_name(path),
            bpm: estimate.bpm,
            beat_count: estimate.beat_count,
            category: estimate.bpm.map(TempoCategory::from_bpm),
            source: estimate.source,
            duration_secs: estimate.duration_secs,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("File: {}\n", self.file);
        match self.bpm {
            Some(bpm) => {
                out.push_str(&format!("Estimated BPM: {:.1}\n", bpm));
                out.push_str(&format!("Beats detected: {}\n", self.beat_count));
                if let Some(category) = self.category {
                    out.push_str(&format!("Tempo: {}\n", category));
                }
            }
            None => out.push_str("Could not detect tempo\n"),
        }
        out
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_boundaries() {
        assert_eq!(TempoCategory::from_bpm(59.9), TempoCategory::VerySlow);
        assert_eq!(TempoCategory::from_bpm(60.0), TempoCategory::Slow);
        assert_eq!(TempoCategory::from_bpm(90.0), TempoCategory::Moderate);
        assert_eq!(TempoCategory::from_bpm(119.9), TempoCategory::Moderate);
        assert_eq!(TempoCategory::from_bpm(120.0), TempoCategory::Fast);
        assert_eq!(TempoCategory::from_bpm(140.0), TempoCategory::VeryFast);
        assert_eq!(TempoCategory::Fast.to_string(), "Fast (Dance/Electronic)");
    }

    #[test]
    fn text_report_for_detected_tempo() {
        let estimate = TempoEstimate {
            bpm: Some(123.04),
            beat_count: 21,
            source: Some(Source::Autocorrelation),
            duration_secs: 10.0,
        };
        let text = FileReport::new(Path::new("music/track_120_bpm.mp3"), &estimate).to_text();
        assert_eq!(
            text,
            "File: track_120_bpm.mp3\nEstimated BPM: 123.0\nBeats detected: 21\nTempo: Fast (Dance/Electronic)\n"
        );
    }

    #[test]
    fn text_report_for_missing_tempo() {
        let text = FileReport::new(Path::new("noise.wav"), &TempoEstimate::undetected(3.0)).to_text();
        assert_eq!(text, "File: noise.wav\nCould not detect tempo\n");
    }

    #[test]
    fn json_report_fields() {
        let estimate = TempoEstimate {
            bpm: Some(90.0),
            beat_count: 15,
            source: Some(Source::Spectral),
            duration_secs: 10.0,
        };
        let json = serde_json::to_value(FileReport::new(Path::new("a.wav"), &estimate)).unwrap();
        assert_eq!(json["file"], "a.wav");
        assert_eq!(json["bpm"], 90.0);
        assert_eq!(json["beat_count"], 15);
        assert_eq!(json["category"], "moderate");
        assert_eq!(json["source"], "spectral");

        let json = serde_json::to_value(FileReport::new(Path::new("b.wav"), &TempoEstimate::undetected(1.0))).unwrap();
        assert!(json["bpm"].is_null());
    }
}
