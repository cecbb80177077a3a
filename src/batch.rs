use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audio::decode::{decode_audio, is_supported};
use crate::audio::prepare::Waveform;
use crate::error::DecodeError;
use crate::label::bpm_from_filename;
use crate::report::display_name;
use crate::tempo::features::TempoEstimate;
use crate::tempo::TempoDetector;

/// Decode one file and run the detector on it.
pub fn analyze_file(path: &Path, detector: &TempoDetector) -> Result<TempoEstimate, DecodeError> {
    let audio = decode_audio(path)?;
    let waveform = Waveform::from_decoded(&audio);
    Ok(detector.detect(&waveform))
}

/// `path` itself if it is a file, otherwise the supported audio files
/// directly inside it, sorted by name.
pub fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?
    {
        let entry = entry?;
        let p = entry.path();
        if p.is_file() && is_supported(&p) {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

/// Analyze every file in parallel, keeping input order.
pub fn analyze_all(
    files: &[PathBuf],
    detector: &TempoDetector,
) -> Vec<(PathBuf, Result<TempoEstimate, DecodeError>)> {
    let pb = progress_bar(files.len());
    let results = files
        .par_iter()
        .map(|path| {
            let result = analyze_file(path, detector);
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();
    pb.finish_and_clear();
    results
}

fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    match ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
    {
        Ok(style) => pb.set_style(style.progress_chars("=>-")),
        Err(e) => log::warn!("Progress bar template rejected: {}", e),
    }
    pb
}

/// One row of a labeled evaluation.
#[derive(Clone, Debug, Serialize)]
pub struct Evaluation {
    pub file: String,
    pub expected: u32,
    pub detected: Option<f32>,
    pub difference: Option<f32>,
    pub within_tolerance: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub total: usize,
    pub tolerance: f32,
}

impl Summary {
    pub fn success_rate(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f32 / self.total as f32 * 100.0
    }
}

pub fn evaluate(
    file: &str,
    expected: u32,
    outcome: &Result<TempoEstimate, DecodeError>,
    tolerance: f32,
) -> Evaluation {
    match outcome {
        Ok(estimate) => {
            let difference = estimate.bpm.map(|bpm| (bpm - expected as f32).abs());
            Evaluation {
                file: file.to_string(),
                expected,
                detected: estimate.bpm,
                difference,
                within_tolerance: difference.is_some_and(|d| d <= tolerance),
                error: estimate.bpm.is_none().then(|| "no tempo detected".to_string()),
            }
        }
        Err(e) => Evaluation {
            file: file.to_string(),
            expected,
            detected: None,
            difference: None,
            within_tolerance: false,
            error: Some(e.to_string()),
        },
    }
}

/// Score analysis results against the tempo labels in their file names.
/// Unlabeled files are skipped.
pub fn evaluate_results(
    results: &[(PathBuf, Result<TempoEstimate, DecodeError>)],
    tolerance: f32,
) -> (Vec<Evaluation>, Summary) {
    let mut rows = Vec::with_capacity(results.len());
    for (path, outcome) in results {
        let name = display_name(path);
        match bpm_from_filename(&name) {
            Ok(expected) => rows.push(evaluate(&name, expected, outcome, tolerance)),
            Err(e) => log::warn!("Skipping {}", e),
        }
    }

    let summary = Summary {
        passed: rows.iter().filter(|r| r.within_tolerance).count(),
        total: rows.len(),
        tolerance,
    };
    (rows, summary)
}

pub fn render_table(rows: &[Evaluation], summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<60} {:<10} {:<10} {:<10} {:<5}\n",
        "File", "Expected", "Detected", "Diff", "OK"
    ));
    out.push_str(&"-".repeat(99));
    out.push('\n');

    for row in rows {
        let detected = row.detected.map_or_else(|| "None".to_string(), |b| format!("{:.1}", b));
        let diff = row.difference.map_or_else(|| "N/A".to_string(), |d| format!("{:.1}", d));
        let ok = if row.within_tolerance { "✓" } else { "✗" };
        out.push_str(&format!(
            "{:<60} {:<10} {:<10} {:<10} {:<5}\n",
            row.file, row.expected, detected, diff, ok
        ));
        if let Some(ref err) = row.error {
            out.push_str(&format!("    error: {}\n", err));
        }
    }

    out.push_str(&format!(
        "\nSummary: {}/{} files within ±{} BPM tolerance\n",
        summary.passed, summary.total, summary.tolerance
    ));
    out.push_str(&format!("Success rate: {:.1}%\n", summary.success_rate()));
    out
}
