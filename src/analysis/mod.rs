//! Spectral analysis of a captured sample window.
//!
//! Windowing, the recursive FFT, and octave aggregation, run on the
//! consumer side against the latest snapshot handed over by the capture
//! stage.

mod complex;
mod fft;
mod octave;
mod window;

pub use complex::Complex;
pub use fft::{fft, Spectrum};
pub use octave::{band_bins, bins_required, octave_bands, octave_bands_into};
pub use window::{apply_window, hann_window, WindowKind};

use crate::error::AnalysisError;
use crate::params::AnalysisConfig;

/// Result of analysing one window
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Analysis {
    pub spectrum: Spectrum,
    /// Mean magnitude per octave band
    pub octaves: Vec<f32>,
}

/// Reusable analysis stage for a fixed window size and band count
#[derive(Debug)]
pub struct Analyzer {
    window_size: usize,
    octave_count: usize,
    window: WindowKind,
    windowed: Vec<Complex>,
}

impl Analyzer {
    /// Create an analyzer, rejecting sizes the FFT or band layout cannot handle
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let n = config.window_size;
        if !n.is_power_of_two() {
            return Err(AnalysisError::WindowNotPowerOfTwo(n));
        }
        let required_bins = bins_required(config.octave_count);
        if required_bins > n / 2 {
            return Err(AnalysisError::TooManyOctaves {
                bands: config.octave_count,
                required_bins,
                available_bins: n / 2,
            });
        }

        Ok(Self {
            window_size: n,
            octave_count: config.octave_count,
            window: config.window,
            windowed: vec![Complex::ZERO; n],
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn octave_count(&self) -> usize {
        self.octave_count
    }

    /// Window, transform, and aggregate one snapshot
    pub fn analyze(&mut self, samples: &[f32]) -> Result<Analysis, AnalysisError> {
        if samples.len() != self.window_size {
            return Err(AnalysisError::WindowLengthMismatch {
                expected: self.window_size,
                actual: samples.len(),
            });
        }

        apply_window(self.window, samples, &mut self.windowed);
        let spectrum = fft(&self.windowed)?;
        let octaves = octave_bands(spectrum.bins(), self.octave_count)?;

        Ok(Analysis { spectrum, octaves })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn config(window_size: usize, octave_count: usize, window: WindowKind) -> AnalysisConfig {
        AnalysisConfig {
            window_size,
            octave_count,
            window,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_analyzer_rejects_bad_sizes() {
        assert_eq!(
            Analyzer::new(&config(500, 8, WindowKind::Hann)).unwrap_err(),
            AnalysisError::WindowNotPowerOfTwo(500)
        );
        assert!(matches!(
            Analyzer::new(&config(128, 8, WindowKind::Hann)),
            Err(AnalysisError::TooManyOctaves { .. })
        ));
    }

    #[test]
    fn test_analyze_rejects_wrong_length() {
        let mut analyzer = Analyzer::new(&AnalysisConfig::default()).unwrap();
        assert_eq!(
            analyzer.analyze(&[0.0; 256]),
            Err(AnalysisError::WindowLengthMismatch {
                expected: 512,
                actual: 256
            })
        );
    }

    #[test]
    fn test_silence_analyses_to_zero() {
        let mut analyzer = Analyzer::new(&AnalysisConfig::default()).unwrap();
        let analysis = analyzer.analyze(&[0.0; 512]).unwrap();

        assert_eq!(analysis.spectrum.len(), 512);
        assert_eq!(analysis.octaves, vec![0.0; 8]);
    }

    #[test]
    fn test_tone_energy_lands_in_its_octave() {
        let n = 512;
        let bin = 40; // band 6 covers bins 32..64
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();

        let mut analyzer = Analyzer::new(&config(n, 8, WindowKind::Hann)).unwrap();
        let analysis = analyzer.analyze(&samples).unwrap();

        assert_eq!(analysis.spectrum.peak_bin(), Some(bin));
        let loudest = analysis
            .octaves
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(loudest, Some(6));
    }
}
