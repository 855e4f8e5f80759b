//! Single-sided amplitude spectrum of a uniformly sampled series.

use std::cmp::Ordering;

use loadsynth_spec::ErrorCode;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{SignalError, SignalResult};

/// Result of spectrum analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    /// Bin frequencies in Hz, `k / (N·Δt)` for `k = 0..=N/2`.
    pub frequency: Vec<f64>,
    /// Single-sided amplitude at each bin.
    pub magnitude: Vec<f64>,
    /// Bin spacing in Hz.
    pub resolution: f64,
}

impl Spectrum {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Returns true if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Frequency of the largest non-DC bin.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitude
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(i, _)| self.frequency[i])
    }

    /// Magnitude at the bin nearest `freq`.
    pub fn magnitude_at(&self, freq: f64) -> Option<f64> {
        if self.is_empty() || freq.is_nan() || freq < 0.0 || self.resolution <= 0.0 {
            return None;
        }
        let bin = (freq / self.resolution).round() as usize;
        self.magnitude.get(bin).copied()
    }
}

/// Computes the single-sided amplitude spectrum of `amplitude` sampled at `time`.
///
/// The transform covers all `N` samples without padding, so the output has
/// `floor(N/2) + 1` bins from DC to Nyquist. The DC bin is `|X₀|/N`; every
/// other bin is `2|Xₖ|/N`. Sample spacing is taken from `time[1] - time[0]`.
/// Fewer than two samples yield an empty spectrum. Non-finite samples
/// propagate into the magnitudes.
pub fn compute_spectrum(time: &[f64], amplitude: &[f64]) -> SignalResult<Spectrum> {
    if time.len() != amplitude.len() {
        return Err(SignalError::validation(
            ErrorCode::SeriesLengthMismatch,
            format!(
                "series has {} times but {} amplitudes",
                time.len(),
                amplitude.len()
            ),
        ));
    }

    let n = amplitude.len();
    if n < 2 {
        return Ok(Spectrum::default());
    }

    let dt = time[1] - time[0];
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SignalError::validation(
            ErrorCode::InvalidSampleSpacing,
            format!("sample spacing must be positive, got {}", dt),
        ));
    }

    let bins = transform(amplitude, n);
    let resolution = 1.0 / (n as f64 * dt);
    let half = n / 2;
    let scale = 2.0 / n as f64;

    let frequency = (0..=half).map(|k| k as f64 * resolution).collect();
    let magnitude = bins
        .iter()
        .take(half + 1)
        .enumerate()
        .map(|(k, c)| {
            let norm = c.norm();
            if k == 0 {
                norm / n as f64
            } else {
                norm * scale
            }
        })
        .collect();

    Ok(Spectrum {
        frequency,
        magnitude,
        resolution,
    })
}

/// Forward DFT of `samples`, zero-padded to `fft_len`.
pub(crate) fn transform(samples: &[f64], fft_len: usize) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .take(fft_len)
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    buffer.resize(fft_len, Complex::new(0.0, 0.0));

    if fft_len > 0 {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_len);
        fft.process(&mut buffer);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn sampled(n: usize, dt: f64, f: impl Fn(f64) -> f64) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let amp = time.iter().map(|&t| f(t)).collect();
        (time, amp)
    }

    #[test]
    fn test_output_length() {
        let (t, a) = sampled(101, 1e-4, |_| 1.0);
        assert_eq!(compute_spectrum(&t, &a).unwrap().len(), 51);
        let (t, a) = sampled(100, 1e-4, |_| 1.0);
        assert_eq!(compute_spectrum(&t, &a).unwrap().len(), 51);
    }

    #[test]
    fn test_frequency_mapping() {
        let (t, a) = sampled(200, 1e-3, |_| 0.0);
        let spectrum = compute_spectrum(&t, &a).unwrap();
        assert!((spectrum.resolution - 5.0).abs() < 1e-9);
        assert!((spectrum.frequency[10] - 50.0).abs() < 1e-9);
        assert!((spectrum.frequency.last().copied().unwrap() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_dc_and_sine_amplitudes() {
        // 3 + 2 sin(2π·50t), 1 s at 1 kHz: 50 Hz lands exactly on bin 50
        let (t, a) = sampled(1000, 1e-3, |t| 3.0 + 2.0 * (TAU * 50.0 * t).sin());
        let spectrum = compute_spectrum(&t, &a).unwrap();
        assert!((spectrum.magnitude[0] - 3.0).abs() < 1e-9);
        assert!((spectrum.magnitude_at(50.0).unwrap() - 2.0).abs() < 1e-9);
        assert!((spectrum.peak_frequency().unwrap() - 50.0).abs() < 1e-9);
        assert!(spectrum.magnitude_at(120.0).unwrap() < 1e-9);
    }

    #[test]
    fn test_short_series_is_empty() {
        assert!(compute_spectrum(&[0.0], &[1.0]).unwrap().is_empty());
        assert!(compute_spectrum(&[], &[]).unwrap().is_empty());
        assert_eq!(Spectrum::default().peak_frequency(), None);
    }

    #[test]
    fn test_invalid_inputs() {
        let err = compute_spectrum(&[0.0, 1.0], &[1.0]).unwrap_err();
        assert_eq!(err.code(), "E051");
        let err = compute_spectrum(&[1.0, 1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.code(), "E050");
    }

    #[test]
    fn test_non_finite_samples_do_not_panic() {
        let spectrum = compute_spectrum(&[0.0, 0.1, 0.2], &[1.0, f64::NAN, 2.0]).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert!(spectrum.magnitude[0].is_nan());
        let _ = spectrum.peak_frequency();
    }
}
