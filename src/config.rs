use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tempo: TempoConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Tunables of both tempo estimators. Defaults are the reference values.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TempoConfig {
    /// STFT frame length in samples
    #[serde(default = "default_frame_length")]
    pub frame_length: usize,
    /// STFT hop in samples
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    /// Moving-average width applied to the spectral flux
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    #[serde(default = "default_min_bpm")]
    pub min_bpm: f32,
    #[serde(default = "default_max_bpm")]
    pub max_bpm: f32,
    /// Minimum normalized autocorrelation value for a lag peak
    #[serde(default = "default_acf_peak_threshold")]
    pub acf_peak_threshold: f32,
    #[serde(default = "default_highpass_cutoff_hz")]
    pub highpass_cutoff_hz: f32,
    /// Envelope decimation factor
    #[serde(default = "default_envelope_downsample")]
    pub envelope_downsample: usize,
    #[serde(default = "default_min_peak_spacing_secs")]
    pub min_peak_spacing_secs: f32,
    #[serde(default = "default_min_peaks")]
    pub min_peaks: usize,
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: f32,
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: f32,
    #[serde(default = "default_min_intervals")]
    pub min_intervals: usize,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationConfig {
    /// Accepted distance from the labeled tempo, in BPM
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            frame_length: default_frame_length(),
            hop_length: default_hop_length(),
            smoothing_window: default_smoothing_window(),
            min_bpm: default_min_bpm(),
            max_bpm: default_max_bpm(),
            acf_peak_threshold: default_acf_peak_threshold(),
            highpass_cutoff_hz: default_highpass_cutoff_hz(),
            envelope_downsample: default_envelope_downsample(),
            min_peak_spacing_secs: default_min_peak_spacing_secs(),
            min_peaks: default_min_peaks(),
            min_interval_secs: default_min_interval_secs(),
            max_interval_secs: default_max_interval_secs(),
            min_intervals: default_min_intervals(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

fn default_frame_length() -> usize { 2048 }
fn default_hop_length() -> usize { 512 }
fn default_smoothing_window() -> usize { 5 }
pub fn default_min_bpm() -> f32 { 60.0 }
pub fn default_max_bpm() -> f32 { 180.0 }
fn default_acf_peak_threshold() -> f32 { 0.1 }
fn default_highpass_cutoff_hz() -> f32 { 100.0 }
fn default_envelope_downsample() -> usize { 32 }
fn default_min_peak_spacing_secs() -> f32 { 0.2 }
fn default_min_peaks() -> usize { 4 }
fn default_min_interval_secs() -> f32 { 0.3 }
fn default_max_interval_secs() -> f32 { 2.0 }
fn default_min_intervals() -> usize { 2 }
pub fn default_tolerance() -> f32 { 5.0 }

/// Combine the loaded config with CLI flags. A flag left at its default
/// yields to the config value; any other value wins.
pub fn merge_cli(cfg: Config, min_bpm: f32, max_bpm: f32, tolerance: f32) -> (TempoConfig, f32) {
    let tempo = TempoConfig {
        min_bpm: if min_bpm == default_min_bpm() { cfg.tempo.min_bpm } else { min_bpm },
        max_bpm: if max_bpm == default_max_bpm() { cfg.tempo.max_bpm } else { max_bpm },
        ..cfg.tempo
    };
    let tolerance = if tolerance == default_tolerance() {
        cfg.evaluation.tolerance
    } else {
        tolerance
    };
    (tempo, tolerance)
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Invalid config {}: {}", path.display(), e);
            None
        }
    }
}

/// Explicit path, else `bpmscan.toml` in the working directory, else the
/// per-user config file.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("bpmscan.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("bpmscan").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("bpmscan").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.tempo, TempoConfig::default());
        assert_eq!(cfg.evaluation.tolerance, 5.0);
    }

    #[test]
    fn partial_tempo_section_keeps_other_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [tempo]
            hop_length = 256
            max_bpm = 200.0

            [evaluation]
            tolerance = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tempo.hop_length, 256);
        assert_eq!(cfg.tempo.max_bpm, 200.0);
        assert_eq!(cfg.tempo.frame_length, 2048);
        assert_eq!(cfg.tempo.min_peaks, 4);
        assert_eq!(cfg.evaluation.tolerance, 3.0);
    }

    #[test]
    fn load_config_rejects_malformed_toml() {
        let path = std::env::temp_dir().join(format!("bpmscan-{}-bad.toml", std::process::id()));
        std::fs::write(&path, "[tempo\nhop_length = ").unwrap();
        let cfg = load_config(&path);
        std::fs::remove_file(&path).ok();
        assert!(cfg.is_none());
    }

    fn from_toml(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn config_fills_flags_left_at_default() {
        let cfg = from_toml(
            r#"
            [tempo]
            min_bpm = 80.0
            max_bpm = 160.0
            hop_length = 256

            [evaluation]
            tolerance = 2.0
            "#,
        );
        let (tempo, tolerance) = merge_cli(cfg, 60.0, 180.0, 5.0);
        assert_eq!(tempo.min_bpm, 80.0);
        assert_eq!(tempo.max_bpm, 160.0);
        assert_eq!(tempo.hop_length, 256);
        assert_eq!(tolerance, 2.0);
    }

    #[test]
    fn non_default_flags_override_config() {
        let cfg = from_toml(
            r#"
            [tempo]
            min_bpm = 80.0
            max_bpm = 160.0

            [evaluation]
            tolerance = 2.0
            "#,
        );
        let (tempo, tolerance) = merge_cli(cfg, 90.0, 200.0, 3.0);
        assert_eq!(tempo.min_bpm, 90.0);
        assert_eq!(tempo.max_bpm, 200.0);
        assert_eq!(tolerance, 3.0);
    }

    #[test]
    fn explicit_default_flag_still_yields_to_config() {
        let cfg = from_toml("[tempo]\nmin_bpm = 80.0\n");
        // `--min-bpm 60` is indistinguishable from leaving it unset
        let (tempo, _) = merge_cli(cfg, 60.0, 180.0, 5.0);
        assert_eq!(tempo.min_bpm, 80.0);
    }

    #[test]
    fn no_config_file_gives_defaults() {
        let (tempo, tolerance) = merge_cli(Config::default(), 60.0, 180.0, 5.0);
        assert_eq!(tempo, TempoConfig::default());
        assert_eq!(tolerance, 5.0);

        let (tempo, _) = merge_cli(Config::default(), 70.0, 180.0, 5.0);
        assert_eq!(tempo.min_bpm, 70.0);
        assert_eq!(tempo.max_bpm, 180.0);
    }

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/custom.toml");
        assert_eq!(resolve_config_path(Some(p)), Some(p.to_path_buf()));
    }
}
