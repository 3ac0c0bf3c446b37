//! Analysis configuration and constants.

use serde::Deserialize;
use std::ops::Range;

use crate::analysis::{band_bins, bins_required, WindowKind};
use crate::error::ConfigError;

/// Spectral analysis configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples per analysis window (must be power of 2)
    pub window_size: usize,

    /// Number of octave bands (band i ≥ 1 spans 2^(i-1) bins)
    pub octave_count: usize,

    /// Window applied before the transform
    pub window: WindowKind,

    /// Sample rate (Hz) used to label bins; the device rate overrides it
    pub sample_rate_hz: u32,

    /// Consumer poll interval (milliseconds)
    /// 16 ≈ one display frame at 60 Hz
    pub poll_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 512,
            octave_count: 8,
            window: WindowKind::Hann,
            sample_rate_hz: 44100,
            poll_interval_ms: 16,
        }
    }
}

impl AnalysisConfig {
    /// Width of one FFT bin (Hz)
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.window_size as f32
    }

    /// Centre frequency of FFT bin `bin` (Hz)
    pub fn bin_to_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width_hz()
    }

    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.window_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Frequency span of octave band `band` (Hz)
    pub fn band_range_hz(&self, band: usize) -> Range<f32> {
        let bins = band_bins(band);
        self.bin_to_hz(bins.start)..self.bin_to_hz(bins.end)
    }

    /// Validate configuration (window size must be power of 2, bands must fit)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 2 || !self.window_size.is_power_of_two() {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        let half = self.window_size / 2;
        if bins_required(self.octave_count) > half {
            return Err(ConfigError::InvalidOctaveCount {
                octaves: self.octave_count,
                window_size: self.window_size,
                half,
            });
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 512);
        assert_eq!(config.octave_count, 8);
    }

    #[test]
    fn test_analysis_config_hz_to_bin() {
        let config = AnalysisConfig::default();

        // At 44100 Hz sample rate and 512 window:
        // Bin resolution = 44100 / 512 ≈ 86.13 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(86.2), 1);
        assert_eq!(config.hz_to_bin(5513.0), 64);
        assert!((config.bin_to_hz(64) - 5512.5).abs() < 1e-2);
    }

    #[test]
    fn test_band_range_hz() {
        let config = AnalysisConfig::default();
        let top = config.band_range_hz(7);
        assert!((top.start - config.bin_to_hz(64)).abs() < 1e-3);
        assert!((top.end - config.bin_to_hz(128)).abs() < 1e-3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_size = AnalysisConfig {
            window_size: 300,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            bad_size.validate(),
            Err(ConfigError::InvalidWindowSize(300))
        ));

        let too_many_bands = AnalysisConfig {
            window_size: 64,
            octave_count: 7,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            too_many_bands.validate(),
            Err(ConfigError::InvalidOctaveCount { .. })
        ));

        let no_rate = AnalysisConfig {
            sample_rate_hz: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(no_rate.validate(), Err(ConfigError::InvalidSampleRate)));
    }
}
