//! Parameter definitions with units and documented semantics.
//!
//! All tunables live here with:
//! - Units (samples, Hz, milliseconds)
//! - Documented ranges and meanings
//! - Validation before anything real-time starts

mod analysis;
mod file;
mod playback;

// Re-export all types
pub use analysis::AnalysisConfig;
pub use file::{locate_config, ConfigFile, DEFAULT_CONFIG_FILE};
pub use playback::PlaybackConfig;

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Synth block size (frames per Glicol block)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}
