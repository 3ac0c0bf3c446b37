//! Playback source configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Audio played through the output device (and captured for analysis)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// WAV file to play; the procedural synth plays when unset
    pub input: Option<PathBuf>,

    /// Restart the file from the beginning when it ends
    pub looping: bool,
}

impl PlaybackConfig {
    pub fn new(input: Option<PathBuf>, looping: bool) -> Self {
        Self { input, looping }
    }

    /// Human-readable description of the configured source
    pub fn describe(&self) -> String {
        match &self.input {
            Some(path) if self.looping => format!("{} (looping)", path.display()),
            Some(path) => path.display().to_string(),
            None => "procedural synth".to_string(),
        }
    }
}
