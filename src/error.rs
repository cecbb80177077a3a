use std::path::PathBuf;

/// Failures while turning an audio file into PCM samples.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupt audio: {0}")]
    Format(#[from] symphonia::core::errors::Error),

    #[error("no audio tracks found")]
    NoTrack,

    #[error("unknown sample rate")]
    UnknownSampleRate,
}

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("could not extract BPM from filename: {0}")]
    NotFound(String),
}
