//! Radix-2 decimation-in-time FFT (recursive Cooley-Tukey).

use std::f32::consts::PI;

use super::complex::Complex;
use crate::error::AnalysisError;

/// Frequency-domain output of [`fft`]: bin `k` corresponds to
/// `k * sample_rate / len()` Hz.
///
/// For a real input, bins `k` and `N - k` are conjugates, so only
/// [`Spectrum::half`] carries independent information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex>,
}

impl Spectrum {
    pub fn bins(&self) -> &[Complex] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins below Nyquist (`0..N/2`)
    pub fn half(&self) -> &[Complex] {
        &self.bins[..self.bins.len() / 2]
    }

    /// Magnitude of every bin
    pub fn magnitudes(&self) -> impl Iterator<Item = f32> + '_ {
        self.bins.iter().map(Complex::magnitude)
    }

    /// Index of the loudest bin below Nyquist, if any
    pub fn peak_bin(&self) -> Option<usize> {
        self.half()
            .iter()
            .map(Complex::magnitude)
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
    }
}

impl From<Vec<Complex>> for Spectrum {
    fn from(bins: Vec<Complex>) -> Self {
        Self { bins }
    }
}

/// Transform `signal` into its spectrum.
///
/// The length must be a non-zero power of two; anything else is rejected
/// before any work is done.
pub fn fft(signal: &[Complex]) -> Result<Spectrum, AnalysisError> {
    let n = signal.len();
    if !n.is_power_of_two() {
        return Err(AnalysisError::WindowNotPowerOfTwo(n));
    }
    Ok(Spectrum::from(recursive_fft(signal)))
}

fn recursive_fft(signal: &[Complex]) -> Vec<Complex> {
    let n = signal.len();
    if n == 1 {
        return signal.to_vec();
    }

    let half_n = n / 2;
    let even: Vec<Complex> = signal.iter().step_by(2).copied().collect();
    let odd: Vec<Complex> = signal.iter().skip(1).step_by(2).copied().collect();

    let freq_even = recursive_fft(&even);
    let freq_odd = recursive_fft(&odd);

    // Sub-transforms repeat with period N/2. All N twiddles are computed
    // directly; conjugate symmetry is not exploited.
    (0..n)
        .map(|k| {
            let m = k % half_n;
            let theta = 2.0 * PI * k as f32 / n as f32;
            let twiddle = Complex::new(theta.cos(), -theta.sin());
            freq_even[m] + freq_odd[m] * twiddle
        })
        .collect()
}
