//! Error types for analysis preconditions and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Contract faults raised by the analysis stages.
///
/// These are never recoverable mid-stream; callers are expected to validate
/// configuration up front so they surface at startup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("window length must be a non-zero power of two, got {0}")]
    WindowNotPowerOfTwo(usize),

    #[error("{bands} octave bands need {required_bins} bins, only {available_bins} are usable")]
    TooManyOctaves {
        bands: usize,
        required_bins: usize,
        available_bins: usize,
    },

    #[error("expected a window of {expected} samples, got {actual}")]
    WindowLengthMismatch { expected: usize, actual: usize },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window size must be a power of two of at least 2, got {0}")]
    InvalidWindowSize(usize),

    #[error("{octaves} octave bands do not fit in {half} bins ({window_size}-sample window)")]
    InvalidOctaveCount {
        octaves: usize,
        window_size: usize,
        half: usize,
    },

    #[error("sample rate must be > 0")]
    InvalidSampleRate,

    #[error("channel count must be > 0")]
    InvalidChannelCount,

    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
