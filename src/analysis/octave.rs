//! Octave band aggregation over the lower half of a spectrum.
//!
//! Band 0 is the DC bin alone; band `i >= 1` covers bins `2^(i-1)..2^i`,
//! so each band is twice as wide as the one before it. Bands 0 and 1 are a
//! single bin each and band 2 averages bins 2 and 3. This differs on purpose
//! from a layout where band `i` spans `2^i` bins starting at `2^i - 1`:
//! here every band above DC is exactly one octave of bin frequencies.

use std::ops::Range;

use super::complex::Complex;
use crate::error::AnalysisError;

/// Bin range covered by octave band `band`
pub fn band_bins(band: usize) -> Range<usize> {
    match band {
        0 => 0..1,
        i => (1 << (i - 1))..(1 << i),
    }
}

/// Total bins consumed by the first `bands` octave bands (saturating)
pub fn bins_required(bands: usize) -> usize {
    match bands {
        0 => 0,
        b => u32::try_from(b - 1)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .unwrap_or(usize::MAX),
    }
}

/// Mean bin magnitude per octave band.
///
/// `bins` is the full spectrum; all bands must fit within its first half,
/// otherwise the request is rejected.
pub fn octave_bands(bins: &[Complex], bands: usize) -> Result<Vec<f32>, AnalysisError> {
    let mut out = vec![0.0; bands];
    octave_bands_into(bins, &mut out)?;
    Ok(out)
}

/// Same as [`octave_bands`], writing one value per slot of `out`.
pub fn octave_bands_into(bins: &[Complex], out: &mut [f32]) -> Result<(), AnalysisError> {
    let bands = out.len();
    let available_bins = bins.len() / 2;
    let required_bins = bins_required(bands);

    if required_bins > available_bins {
        return Err(AnalysisError::TooManyOctaves {
            bands,
            required_bins,
            available_bins,
        });
    }

    for (band, value) in out.iter_mut().enumerate() {
        let range = band_bins(band);
        let width = range.len() as f32;
        *value = bins[range].iter().map(Complex::magnitude).sum::<f32>() / width;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_layout() {
        assert_eq!(band_bins(0), 0..1);
        assert_eq!(band_bins(1), 1..2);
        assert_eq!(band_bins(2), 2..4);
        assert_eq!(band_bins(3), 4..8);
        assert_eq!(band_bins(7), 64..128);

        // Bands tile the half-spectrum without gaps
        for band in 1..8 {
            assert_eq!(band_bins(band - 1).end, band_bins(band).start);
        }
        assert_eq!(bins_required(8), 128);
        assert_eq!(bins_required(0), 0);
    }

    #[test]
    fn test_three_bands_average_magnitudes() {
        let mut bins = vec![Complex::ZERO; 8];
        bins[0] = Complex::from_real(2.0);
        bins[1] = Complex::new(0.0, -4.0);
        bins[2] = Complex::from_real(6.0);
        bins[3] = Complex::new(6.0, 8.0); // magnitude 10

        let bands = octave_bands(&bins, 3).unwrap();
        assert_eq!(bands, vec![2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_rejects_bands_past_nyquist() {
        let bins = vec![Complex::from_real(1.0); 8];

        // 4 bands need 8 bins but only 4 are usable
        assert_eq!(
            octave_bands(&bins, 4),
            Err(AnalysisError::TooManyOctaves {
                bands: 4,
                required_bins: 8,
                available_bins: 4,
            })
        );

        // Absurd band counts must not overflow the shift
        assert!(octave_bands(&bins, 200).is_err());
    }

    #[test]
    fn test_default_sizing_fits() {
        let bins = vec![Complex::from_real(1.0); 512];
        let bands = octave_bands(&bins, 8).unwrap();
        assert_eq!(bands.len(), 8);
        assert!(bands.iter().all(|&b| (b - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_zero_bands_is_empty() {
        assert_eq!(octave_bands(&[], 0).unwrap(), Vec::<f32>::new());
    }
}
