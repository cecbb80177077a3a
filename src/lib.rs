//! Tempo (BPM) estimation from raw audio.
//!
//! Two independent estimators run over a peak-normalized mono waveform: an
//! autocorrelation of the spectral-flux onset signal, and peak spacing in a
//! high-passed amplitude envelope. Their results are folded into the
//! configured tempo band and the autocorrelation answer is preferred.
//!
//! ```no_run
//! let samples: Vec<f32> = vec![0.0; 22050 * 10];
//! let estimate = bpmscan::estimate_tempo(&samples, 22050);
//! match estimate.bpm {
//!     Some(bpm) => println!("{:.1} BPM, ~{} beats", bpm, estimate.beat_count),
//!     None => println!("could not detect tempo"),
//! }
//! ```

pub mod audio;
pub mod batch;
pub mod config;
pub mod error;
pub mod label;
pub mod report;
pub mod tempo;

pub use audio::prepare::Waveform;
pub use config::TempoConfig;
pub use error::{DecodeError, LabelError};
pub use tempo::features::{Candidate, Source, TempoEstimate};
pub use tempo::{estimate_tempo, TempoDetector};
