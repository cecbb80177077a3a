use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bpmscan", about = "Estimate the tempo (BPM) of audio files")]
pub struct Cli {
    /// Audio file (MP3, WAV, FLAC, OGG, AAC) or a directory of them
    pub input: PathBuf,

    /// Config file (defaults to ./bpmscan.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Compare results against `_<bpm>_bpm` labels in the file names
    #[arg(short, long)]
    pub evaluate: bool,

    /// Accepted error in BPM when evaluating
    #[arg(short, long, default_value_t = 5.0)]
    pub tolerance: f32,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Lower bound of the tempo band
    #[arg(long, default_value_t = 60.0)]
    pub min_bpm: f32,

    /// Upper bound of the tempo band
    #[arg(long, default_value_t = 180.0)]
    pub max_bpm: f32,
}
