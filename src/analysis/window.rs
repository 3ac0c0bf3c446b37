//! Window functions applied to a sample window before the transform.

use serde::Deserialize;
use std::f32::consts::PI;

use super::complex::Complex;

/// Smoothing window applied to the raw samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Hann window, zero at the edges and one at the centre
    #[default]
    Hann,
    /// No attenuation (every weight is 1)
    Rectangular,
}

impl WindowKind {
    /// Weight for sample `index` of a window of `size` samples
    pub fn weight(self, index: usize, size: usize) -> f32 {
        match self {
            WindowKind::Hann => hann_window(index, size),
            WindowKind::Rectangular => 1.0,
        }
    }
}

/// Hann window weight via the power-of-sine form `sin²(π·n/N)`.
///
/// Periodic variant: `weight(0) == 0`, peak `weight(N/2) == 1`, and
/// `weight(n) == weight(N - n)`.
pub fn hann_window(index: usize, size: usize) -> f32 {
    let s = (PI * index as f32 / size as f32).sin();
    s * s
}

/// Write `samples[n] * weight(n)` into `out` as purely real values.
///
/// `out` must be the same length as `samples`.
pub fn apply_window(kind: WindowKind, samples: &[f32], out: &mut [Complex]) {
    debug_assert_eq!(samples.len(), out.len());
    let size = samples.len();
    for (n, (sample, slot)) in samples.iter().zip(out.iter_mut()).enumerate() {
        *slot = Complex::from_real(sample * kind.weight(n, size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 512;

        // Zero at the start, one at the centre
        assert_eq!(hann_window(0, size), 0.0);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hann_window_symmetry() {
        for &size in &[8usize, 64, 512, 1024] {
            for n in 1..size {
                let a = hann_window(n, size);
                let b = hann_window(size - n, size);
                assert!((a - b).abs() < 1e-5, "n={n} size={size}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_apply_window_zeroes_imaginary_part() {
        let samples = [1.0f32; 8];
        let mut out = [Complex::new(9.0, 9.0); 8];
        apply_window(WindowKind::Hann, &samples, &mut out);

        assert_eq!(out[0].re, 0.0);
        assert!((out[4].re - 1.0).abs() < 1e-6);
        assert!(out.iter().all(|c| c.im == 0.0));
    }

    #[test]
    fn test_rectangular_is_identity() {
        let samples = [0.25f32, -0.5, 0.75, -1.0];
        let mut out = [Complex::ZERO; 4];
        apply_window(WindowKind::Rectangular, &samples, &mut out);

        for (s, c) in samples.iter().zip(out.iter()) {
            assert_eq!(c.re, *s);
        }
    }
}
