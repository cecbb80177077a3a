mod cli;

use anyhow::Result;
use clap::Parser;

use bpmscan::config::{self, Config};
use bpmscan::report::FileReport;
use bpmscan::{batch, TempoDetector};
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::default();
    if let Some(path) = config::resolve_config_path(cli.config.as_deref()) {
        if let Some(loaded) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            cfg = loaded;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let (tempo_config, tolerance) = config::merge_cli(cfg, cli.min_bpm, cli.max_bpm, cli.tolerance);

    if tempo_config.min_bpm <= 0.0 || tempo_config.min_bpm >= tempo_config.max_bpm {
        anyhow::bail!(
            "Invalid tempo band [{}, {}]",
            tempo_config.min_bpm,
            tempo_config.max_bpm
        );
    }
    if tempo_config.frame_length == 0 || tempo_config.hop_length == 0 {
        anyhow::bail!("frame_length and hop_length must be positive");
    }

    if !cli.input.exists() {
        anyhow::bail!("Input not found: {}", cli.input.display());
    }

    let files = batch::collect_audio_files(&cli.input)?;
    if files.is_empty() {
        anyhow::bail!("No audio files found in {}", cli.input.display());
    }

    log::info!(
        "Analyzing {} file(s), tempo band {}-{} BPM",
        files.len(),
        tempo_config.min_bpm,
        tempo_config.max_bpm
    );

    let detector = TempoDetector::new(tempo_config);
    let results = batch::analyze_all(&files, &detector);

    if cli.evaluate {
        let (rows, summary) = batch::evaluate_results(&results, tolerance);
        if cli.json {
            let out = serde_json::json!({ "results": rows, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            print!("{}", batch::render_table(&rows, &summary));
        }
        return Ok(());
    }

    // A single unreadable file is a hard failure; in a batch it is reported and skipped
    if let [(path, Err(e))] = results.as_slice() {
        anyhow::bail!("Failed to analyze {}: {}", path.display(), e);
    }

    let mut reports = Vec::with_capacity(results.len());
    for (path, outcome) in &results {
        match outcome {
            Ok(estimate) => reports.push(FileReport::new(path, estimate)),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (i, r) in reports.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", r.to_text());
        }
    }

    Ok(())
}
