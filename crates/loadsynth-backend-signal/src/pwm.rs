//! Natural-sampling PWM synthesis.
//!
//! The target is a sum of sinusoids. It is normalized by its peak magnitude
//! over the sampled horizon and compared against a symmetric triangular
//! carrier in `[-1, 1]`; the comparison switches the output between
//! `+output_amplitude` and `-output_amplitude` (bipolar) or `0` (unipolar).

use std::f64::consts::TAU;

use loadsynth_spec::{PwmHarmonic, PwmSettings};

/// Recommended ratio of carrier frequency to the highest harmonic frequency.
///
/// Below this the switched spectrum aliases visibly. It is a recommendation
/// only: synthesis logs a warning and proceeds.
pub const CARRIER_MARGIN: f64 = 10.0;

/// Switched output and the unscaled target it tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PwmOutput {
    /// Switched PWM output at each sample time.
    pub amplitude: Vec<f64>,
    /// `target(t_i)` before normalization.
    pub target: Vec<f64>,
}

/// Sum of harmonic sinusoids at time `t`.
///
/// `Σ A·sin(2π·f·t + φ)` with `φ` given in degrees.
pub fn target(harmonics: &[PwmHarmonic], t: f64) -> f64 {
    harmonics
        .iter()
        .map(|h| h.amplitude * (TAU * h.frequency * t + h.phase_radians()).sin())
        .sum()
}

/// Symmetric triangular carrier in `[-1, 1]`, starting at `-1`.
///
/// Returns `0.0` for a non-positive or non-finite frequency.
pub fn carrier(t: f64, frequency: f64) -> f64 {
    if !frequency.is_finite() || frequency <= 0.0 {
        return 0.0;
    }
    let phase = (t * frequency).rem_euclid(1.0);
    if phase < 0.5 {
        -1.0 + 4.0 * phase
    } else {
        3.0 - 4.0 * phase
    }
}

/// Returns true if the carrier clears [`CARRIER_MARGIN`] times the highest
/// harmonic frequency, logging a warning otherwise.
pub fn check_carrier_margin(settings: &PwmSettings) -> bool {
    let Some(highest) = settings.max_harmonic_frequency() else {
        return true;
    };
    let recommended = highest * CARRIER_MARGIN;
    if settings.carrier_frequency < recommended {
        log::warn!(
            "carrier frequency {} Hz is below {}x the highest harmonic ({} Hz); expect aliasing",
            settings.carrier_frequency,
            CARRIER_MARGIN,
            highest
        );
        return false;
    }
    true
}

/// Synthesizes the PWM output on the given sample times.
///
/// Settings are assumed valid (positive carrier, at least one harmonic).
pub fn synthesize(settings: &PwmSettings, time: &[f64]) -> PwmOutput {
    check_carrier_margin(settings);
    modulate(settings, time)
}

/// [`synthesize`] without the carrier-margin check.
pub(crate) fn modulate(settings: &PwmSettings, time: &[f64]) -> PwmOutput {
    let target_values: Vec<f64> = time.iter().map(|&t| target(&settings.harmonics, t)).collect();
    let scale = normalization_peak(&target_values);

    let high = settings.output_amplitude;
    let low = if settings.bipolar { -high } else { 0.0 };

    let amplitude = time
        .iter()
        .zip(&target_values)
        .map(|(&t, &value)| {
            if value / scale >= carrier(t, settings.carrier_frequency) {
                high
            } else {
                low
            }
        })
        .collect();

    PwmOutput {
        amplitude,
        target: target_values,
    }
}

/// Peak `|target|` over the samples, or `1.0` when it is zero or not finite.
fn normalization_peak(values: &[f64]) -> f64 {
    let peak = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if peak > 0.0 && peak.is_finite() {
        peak
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(end: f64, dt: f64) -> Vec<f64> {
        let n = (end / dt + 1e-9).floor() as usize + 1;
        (0..n).map(|i| i as f64 * dt).collect()
    }

    fn single(frequency: f64, amplitude: f64) -> PwmSettings {
        PwmSettings::default().with_harmonics(vec![PwmHarmonic::new(frequency, amplitude, 0.0)])
    }

    #[test]
    fn test_target_sums_harmonics() {
        let harmonics = vec![
            PwmHarmonic::new(50.0, 2.0, 0.0),
            PwmHarmonic::new(150.0, 1.0, 90.0),
        ];
        // 2*sin(pi/2) + 1*sin(3pi/2 + pi/2)
        assert!((target(&harmonics, 0.005) - 2.0).abs() < 1e-12);
        assert!((target(&harmonics, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_carrier_shape() {
        let fc = 1000.0;
        assert!((carrier(0.0, fc) + 1.0).abs() < 1e-12);
        assert!(carrier(0.00025, fc).abs() < 1e-12);
        assert!((carrier(0.0005, fc) - 1.0).abs() < 1e-12);
        assert!(carrier(0.00075, fc).abs() < 1e-9);
        assert_eq!(carrier(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_bipolar_values() {
        let out = synthesize(&single(50.0, 1000.0), &grid(0.02, 1e-5));
        assert!(out
            .amplitude
            .iter()
            .all(|&v| v == 1000.0 || v == -1000.0));
        assert!(out.amplitude.contains(&1000.0));
        assert!(out.amplitude.contains(&-1000.0));
    }

    #[test]
    fn test_unipolar_values() {
        let mut settings = single(50.0, 1000.0);
        settings.bipolar = false;
        settings.output_amplitude = 24.0;
        let out = synthesize(&settings, &grid(0.02, 1e-5));
        assert!(out.amplitude.iter().all(|&v| v == 24.0 || v == 0.0));
    }

    #[test]
    fn test_target_is_unscaled() {
        let out = synthesize(&single(50.0, 7.0), &grid(0.02, 1e-4));
        let peak = out.target.iter().fold(0.0_f64, |a, v| a.max(v.abs()));
        assert!((peak - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_duty_tracks_target() {
        // Over one target period the positive half-cycle should be mostly high.
        let out = synthesize(&single(50.0, 1.0), &grid(0.02, 1e-6));
        let first_half = &out.amplitude[..10_000];
        let high = first_half.iter().filter(|&&v| v > 0.0).count();
        assert!(high > 5_000, "high samples in positive half: {}", high);
    }

    #[test]
    fn test_zero_amplitude_target_does_not_divide_by_zero() {
        let out = synthesize(&single(50.0, 0.0), &grid(0.001, 1e-5));
        assert!(out.amplitude.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_carrier_margin() {
        let mut settings = single(50.0, 1.0);
        settings.carrier_frequency = 10_000.0;
        assert!(check_carrier_margin(&settings));
        settings.carrier_frequency = 400.0;
        assert!(!check_carrier_margin(&settings));
    }
}
