//! Terminal meter for the three analysis views.

use std::fmt::Write;

use crate::analysis::Analysis;
use crate::params::AnalysisConfig;

/// Display range below 0 dB full scale
pub const DECIBEL_RANGE: f32 = 6.0;

/// Characters per full-height bar
const BAR_WIDTH: usize = 48;

/// Columns used by the sparkline views
const COLUMNS: usize = 64;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Which representation of the latest window to show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    /// Mono samples of the latest window
    Time,
    /// Bin magnitudes up to Nyquist
    Frequency,
    /// Octave band magnitudes
    #[default]
    Octaves,
}

/// Map a linear magnitude onto 0..=1 over the top [`DECIBEL_RANGE`] dB
pub fn level(linear: f32) -> f32 {
    let decibels = 20.0 * linear.log10();
    ((decibels + DECIBEL_RANGE).max(0.0) / DECIBEL_RANGE).min(1.0)
}

/// Render one frame of `view` as text
pub fn render(
    view: View,
    samples: &[f32],
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> String {
    let mut out = String::new();
    match view {
        View::Time => {
            // Samples sit in [-1, 1]; shift to [0, 1]
            let line = sparkline(samples, |s| (s.clamp(-1.0, 1.0) + 1.0) * 0.5);
            let _ = writeln!(out, "time   |{line}|");
        }
        View::Frequency => {
            let magnitudes: Vec<f32> = analysis
                .spectrum
                .half()
                .iter()
                .map(|bin| bin.magnitude())
                .collect();
            let line = sparkline(&magnitudes, level);
            let _ = writeln!(
                out,
                "freq   |{line}| 0..{:.0}Hz",
                config.bin_to_hz(magnitudes.len())
            );
        }
        View::Octaves => {
            for (band, &value) in analysis.octaves.iter().enumerate() {
                let range = config.band_range_hz(band);
                let width = (level(value) * BAR_WIDTH as f32).round() as usize;
                let _ = writeln!(
                    out,
                    "{:>6.0}-{:<6.0}Hz |{:<bar$}|",
                    range.start,
                    range.end,
                    "#".repeat(width),
                    bar = BAR_WIDTH
                );
            }
        }
    }
    out
}

/// Downsample `values` to at most [`COLUMNS`] block characters, taking the
/// maximum of each group after mapping through `scale` (0..=1)
fn sparkline(values: &[f32], scale: impl Fn(f32) -> f32) -> String {
    if values.is_empty() {
        return String::new();
    }
    let group = values.len().div_ceil(COLUMNS);
    values
        .chunks(group)
        .map(|chunk| {
            let peak = chunk.iter().map(|&v| scale(v)).fold(0.0f32, f32::max);
            let index = (peak * (LEVELS.len() - 1) as f32).round() as usize;
            LEVELS[index.min(LEVELS.len() - 1)]
        })
        .collect()
}
