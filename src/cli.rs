//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::WindowKind;
use crate::display::View;
use crate::params::{AnalysisConfig, ConfigFile, PlaybackConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "octave-scope")]
#[command(about = "Real-time FFT and octave-band meter for audio playback", long_about = None)]
pub struct Args {
    /// WAV file to play and analyse (procedural synth when omitted)
    pub input: Option<PathBuf>,

    /// Config file (defaults to ./octave-scope.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Samples per analysis window (power of 2)
    #[arg(long, value_name = "SAMPLES")]
    pub window_size: Option<usize>,

    /// Number of octave bands
    #[arg(long, value_name = "BANDS")]
    pub octaves: Option<usize>,

    /// Window applied before the FFT
    #[arg(long, value_enum)]
    pub window: Option<WindowKind>,

    /// What to display
    #[arg(long, value_enum, default_value_t = View::Octaves)]
    pub view: View,

    /// Loop the input file
    #[arg(long = "loop")]
    pub looping: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Display poll interval (milliseconds)
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,
}

impl Args {
    /// Layer command-line flags over values from the config file
    pub fn apply_overrides(&self, file: ConfigFile) -> (AnalysisConfig, PlaybackConfig) {
        let ConfigFile {
            mut analysis,
            mut playback,
        } = file;

        if let Some(window_size) = self.window_size {
            analysis.window_size = window_size;
        }
        if let Some(octaves) = self.octaves {
            analysis.octave_count = octaves;
        }
        if let Some(window) = self.window {
            analysis.window = window;
        }
        if let Some(interval_ms) = self.interval_ms {
            analysis.poll_interval_ms = interval_ms;
        }
        if self.input.is_some() {
            playback.input = self.input.clone();
        }
        playback.looping |= self.looping;

        (analysis, playback)
    }

    /// Run time limit, if any. Values that are not a positive, representable
    /// number of seconds mean no limit.
    pub fn run_duration(&self) -> Option<Duration> {
        self.duration
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
    }
}
