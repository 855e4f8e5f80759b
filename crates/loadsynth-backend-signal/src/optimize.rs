//! PWM harmonic optimization.
//!
//! The optimizer only rewrites `harmonics`; callers regenerate afterwards
//! (see [`crate::refresh`]).

use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use loadsynth_spec::validation::validate_target_frequency;
use loadsynth_spec::{ErrorCode, LoadDefinition, PwmHarmonic, PwmSettings, ValidationError};

use crate::error::{SignalError, SignalResult};
use crate::pwm;
use crate::spectrum::transform;

/// Longest time grid the error search works on; later samples are ignored.
pub const SEARCH_MAX_SAMPLES: usize = 500_000;

/// Bins on each side of a chosen frequency that later picks must avoid.
const BIN_GUARD: usize = 3;

/// How harmonics are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimizeStrategy {
    /// Odd-harmonic Fourier series of a square wave at the target frequency.
    #[default]
    FourierSeries,
    /// Greedy search minimizing RMS error between the PWM output and a pure
    /// sine at the target frequency.
    ErrorSearch,
}

impl OptimizeStrategy {
    /// Returns the strategy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizeStrategy::FourierSeries => "fourier",
            OptimizeStrategy::ErrorSearch => "error-search",
        }
    }
}

impl fmt::Display for OptimizeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fourier" | "fourier-series" => Ok(OptimizeStrategy::FourierSeries),
            "error-search" | "search" => Ok(OptimizeStrategy::ErrorSearch),
            other => Err(format!(
                "unknown optimize strategy '{}', expected 'fourier' or 'error-search'",
                other
            )),
        }
    }
}

/// Replaces the PWM harmonics with `count` Fourier-series terms.
///
/// See [`optimize_harmonics_with`].
pub fn optimize_harmonics(def: &mut LoadDefinition, count: usize) -> SignalResult<()> {
    optimize_harmonics_with(def, count, OptimizeStrategy::default())
}

/// Replaces the PWM harmonics of `def` using `strategy`.
///
/// # Errors
/// - `E034` if `count` is zero
/// - `E040` if `def` is not a PWM definition
/// - `E031` if the target frequency is not positive
/// - for [`OptimizeStrategy::ErrorSearch`], the time-grid and carrier errors
///   generation would raise
pub fn optimize_harmonics_with(
    def: &mut LoadDefinition,
    count: usize,
    strategy: OptimizeStrategy,
) -> SignalResult<()> {
    if count == 0 {
        return Err(SignalError::validation(
            ErrorCode::InvalidHarmonicCount,
            "harmonic count must be at least 1",
        ));
    }

    let (end_time, delta_time) = (def.end_time, def.delta_time);
    let mode = def.input_mode();
    let Some(settings) = def.pwm_mut() else {
        return Err(SignalError::validation(
            ErrorCode::WrongInputMode,
            format!("harmonic optimization needs a pwm definition, got {}", mode),
        ));
    };
    validate_target_frequency(settings)?;

    let harmonics = match strategy {
        OptimizeStrategy::FourierSeries => {
            fourier_series(settings.target_frequency, settings.output_amplitude, count)
        }
        OptimizeStrategy::ErrorSearch => {
            let n = loadsynth_spec::sample_count(end_time, delta_time)?;
            validate_carrier(settings)?;
            let time: Vec<f64> = (0..n.min(SEARCH_MAX_SAMPLES))
                .map(|i| i as f64 * delta_time)
                .collect();
            error_search(settings, &time, count)
        }
    };

    log::info!(
        "optimized {} harmonic(s) at {} Hz using {}",
        harmonics.len(),
        settings.target_frequency,
        strategy
    );
    settings.harmonics = harmonics;
    Ok(())
}

fn validate_carrier(settings: &PwmSettings) -> Result<(), ValidationError> {
    if !settings.carrier_frequency.is_finite() || settings.carrier_frequency <= 0.0 {
        return Err(ValidationError::with_path(
            ErrorCode::NonPositiveCarrierFrequency,
            format!(
                "carrier frequency must be positive, got {}",
                settings.carrier_frequency
            ),
            "input.carrier_frequency",
        ));
    }
    Ok(())
}

/// First `count` odd terms of the square-wave series at `f0`.
///
/// Term `k = 1, 3, 5, ...` has frequency `k·f0`, amplitude
/// `output_amplitude·4/(kπ)`, and phase `0`.
pub fn fourier_series(f0: f64, output_amplitude: f64, count: usize) -> Vec<PwmHarmonic> {
    (0..count)
        .map(|i| {
            let k = (2 * i + 1) as f64;
            PwmHarmonic::new(k * f0, output_amplitude * 4.0 / (k * PI), 0.0)
        })
        .collect()
}

/// Search state: settings under trial and the ideal sine they should reproduce.
struct ErrorSearch<'a> {
    settings: PwmSettings,
    time: &'a [f64],
    ideal: Vec<f64>,
}

impl ErrorSearch<'_> {
    fn output(&self) -> Vec<f64> {
        pwm::modulate(&self.settings, self.time).amplitude
    }

    fn rms(&self) -> f64 {
        rms_error(&self.output(), &self.ideal)
    }

    fn harmonics(&mut self) -> &mut Vec<PwmHarmonic> {
        &mut self.settings.harmonics
    }
}

fn rms_error(actual: &[f64], ideal: &[f64]) -> f64 {
    let len = actual.len().min(ideal.len());
    if len == 0 {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(ideal)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    (sum / len as f64).sqrt()
}

fn error_search(settings: &PwmSettings, time: &[f64], count: usize) -> Vec<PwmHarmonic> {
    let f0 = settings.target_frequency;
    let out = settings.output_amplitude;
    let dt = match time {
        [first, second, ..] => second - first,
        _ => return fourier_series(f0, out, 1),
    };

    let mut search = ErrorSearch {
        settings: settings.clone(),
        time,
        ideal: time.iter().map(|&t| out * (TAU * f0 * t).sin()).collect(),
    };
    search.settings.harmonics = vec![PwmHarmonic::new(f0, out * 0.85, 0.0)];

    let fft_len = time.len().next_power_of_two();
    let resolution = 1.0 / (fft_len as f64 * dt);
    let half = fft_len / 2;
    let mut used = vec![false; half];
    mark_used(&mut used, (f0 / resolution).round() as usize);

    // Greedily cancel the dominant error component
    for _ in 1..count {
        let error: Vec<f64> = search
            .output()
            .iter()
            .zip(&search.ideal)
            .map(|(a, b)| a - b)
            .collect();
        let bins = transform(&error, fft_len);

        let peak = (1..half)
            .filter(|&k| !used[k])
            .map(|k| (k, bins[k].norm_sqr()))
            .filter(|(_, mag_sq)| *mag_sq > 0.0)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let Some((k, mag_sq)) = peak else {
            log::debug!("error spectrum has no free bins left");
            break;
        };
        mark_used(&mut used, k);

        let frequency = k as f64 * resolution;
        let error_amp = mag_sq.sqrt() * 2.0 / fft_len as f64;
        let cancel_phase = bins[k].re.atan2(-bins[k].im).to_degrees() + 180.0;

        let mut best_err = search.rms();
        let mut best_amp = error_amp * 0.3;
        for step in 1..=15 {
            let amp = error_amp * step as f64 * 0.1;
            search
                .harmonics()
                .push(PwmHarmonic::new(frequency, amp, cancel_phase));
            let err = search.rms();
            search.harmonics().pop();
            if err < best_err {
                best_err = err;
                best_amp = amp;
            }
        }

        log::debug!(
            "added {:.3} Hz at amplitude {:.3}, phase {:.1} deg (rms {:.4})",
            frequency,
            best_amp,
            cancel_phase,
            best_err
        );
        search
            .harmonics()
            .push(PwmHarmonic::new(frequency, best_amp, cancel_phase));
    }

    refine_fundamental(&mut search, out);
    for _ in 0..2 {
        coordinate_descent(&mut search);
    }

    search.settings.harmonics
}

/// Marks `bin` and its guard bins; bins past the end of `used` are ignored.
fn mark_used(used: &mut [bool], bin: usize) {
    let lo = bin.saturating_sub(BIN_GUARD);
    let hi = bin.saturating_add(BIN_GUARD).saturating_add(1).min(used.len());
    if let Some(slots) = used.get_mut(lo..hi) {
        slots.fill(true);
    }
}

/// Grid-searches the fundamental amplitude over `0.4..1.54` of the output.
fn refine_fundamental(search: &mut ErrorSearch<'_>, out: f64) {
    let mut best_err = search.rms();
    let mut best_amp = search.harmonics()[0].amplitude;
    for step in 0..20 {
        let amp = out * (0.4 + step as f64 * 0.06);
        search.harmonics()[0].amplitude = amp;
        let err = search.rms();
        if err < best_err {
            best_err = err;
            best_amp = amp;
        }
    }
    search.harmonics()[0].amplitude = best_amp;
}

/// Tunes each harmonic's amplitude (±30 %) and then its phase (±30°).
fn coordinate_descent(search: &mut ErrorSearch<'_>) {
    for index in 0..search.settings.harmonics.len() {
        let mut best_err = search.rms();

        let base_amp = search.harmonics()[index].amplitude;
        let mut best_amp = base_amp;
        for step in [-3, -2, -1, 1, 2, 3] {
            let amp = base_amp * (1.0 + step as f64 * 0.1);
            if amp <= 0.0 {
                continue;
            }
            search.harmonics()[index].amplitude = amp;
            let err = search.rms();
            if err < best_err {
                best_err = err;
                best_amp = amp;
            }
        }
        search.harmonics()[index].amplitude = best_amp;

        let base_phase = search.harmonics()[index].phase;
        let mut best_phase = base_phase;
        for step in [-3, -2, -1, 1, 2, 3] {
            let phase = base_phase + step as f64 * 10.0;
            search.harmonics()[index].phase = phase;
            let err = search.rms();
            if err < best_err {
                best_err = err;
                best_phase = phase;
            }
        }
        search.harmonics()[index].phase = best_phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadsynth_spec::LoadInput;
    use pretty_assertions::assert_eq;

    fn pwm_def() -> LoadDefinition {
        LoadDefinition::new("pwm", 0.02, 1e-5, LoadInput::Pwm(PwmSettings::default()))
    }

    #[test]
    fn test_fourier_series_terms() {
        let harmonics = fourier_series(50.0, 1000.0, 4);
        let freqs: Vec<f64> = harmonics.iter().map(|h| h.frequency).collect();
        assert_eq!(freqs, vec![50.0, 150.0, 250.0, 350.0]);
        assert!((harmonics[0].amplitude - 4000.0 / PI).abs() < 1e-9);
        assert!((harmonics[1].amplitude - 4000.0 / (3.0 * PI)).abs() < 1e-9);
        assert!(harmonics.iter().all(|h| h.phase == 0.0));
        assert!(harmonics
            .windows(2)
            .all(|w| w[1].amplitude.abs() < w[0].amplitude.abs()));
    }

    #[test]
    fn test_optimize_writes_exactly_n() {
        let mut def = pwm_def();
        optimize_harmonics(&mut def, 5).unwrap();
        assert_eq!(def.pwm().unwrap().harmonics.len(), 5);
        optimize_harmonics(&mut def, 2).unwrap();
        assert_eq!(def.pwm().unwrap().harmonics.len(), 2);
    }

    #[test]
    fn test_optimize_rejects_bad_input() {
        let mut def = pwm_def();
        assert_eq!(optimize_harmonics(&mut def, 0).unwrap_err().code(), "E034");

        def.pwm_mut().unwrap().target_frequency = 0.0;
        assert_eq!(optimize_harmonics(&mut def, 3).unwrap_err().code(), "E031");

        let mut expr = LoadDefinition::new("e", 1.0, 0.1, LoadInput::expression("t"));
        assert_eq!(optimize_harmonics(&mut expr, 3).unwrap_err().code(), "E040");
    }

    #[test]
    fn test_failed_optimize_leaves_harmonics() {
        let mut def = pwm_def();
        def.pwm_mut().unwrap().harmonics = vec![PwmHarmonic::new(60.0, 1.0, 0.0)];
        def.pwm_mut().unwrap().carrier_frequency = -1.0;
        let err = optimize_harmonics_with(&mut def, 3, OptimizeStrategy::ErrorSearch).unwrap_err();
        assert_eq!(err.code(), "E030");
        assert_eq!(def.pwm().unwrap().harmonics, vec![PwmHarmonic::new(60.0, 1.0, 0.0)]);
    }

    #[test]
    fn test_error_search_lowers_rms_error() {
        let mut def = pwm_def();
        optimize_harmonics_with(&mut def, 3, OptimizeStrategy::ErrorSearch).unwrap();

        let settings = def.pwm().unwrap();
        let harmonics = &settings.harmonics;
        assert_eq!(harmonics.len(), 3);
        assert_eq!(harmonics[0].frequency, 50.0);
        assert!(harmonics[0].amplitude > 0.0);
        assert!(harmonics[1..].iter().all(|h| h.frequency != 50.0));

        let time: Vec<f64> = (0..2001).map(|i| i as f64 * 1e-5).collect();
        let ideal: Vec<f64> = time.iter().map(|&t| 1000.0 * (TAU * 50.0 * t).sin()).collect();
        let start = PwmSettings {
            harmonics: vec![PwmHarmonic::new(50.0, 850.0, 0.0)],
            ..settings.clone()
        };
        let start_rms = rms_error(&pwm::modulate(&start, &time).amplitude, &ideal);
        let final_rms = rms_error(&pwm::modulate(settings, &time).amplitude, &ideal);
        // A flipped cancelling phase ends within 1% of the start
        assert!(
            final_rms < 0.99 * start_rms,
            "final rms {} vs start rms {}",
            final_rms,
            start_rms
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("fourier".parse(), Ok(OptimizeStrategy::FourierSeries));
        assert_eq!("Error-Search".parse(), Ok(OptimizeStrategy::ErrorSearch));
        assert!("nope".parse::<OptimizeStrategy>().is_err());
        assert_eq!(OptimizeStrategy::ErrorSearch.to_string(), "error-search");
    }

    #[test]
    fn test_mark_used_clamps() {
        let mut used = vec![false; 6];
        mark_used(&mut used, 1);
        assert_eq!(used, vec![true, true, true, true, true, false]);
        let mut used = vec![false; 6];
        mark_used(&mut used, 5);
        assert_eq!(used, vec![false, false, true, true, true, true]);
    }

    #[test]
    fn test_mark_used_ignores_bins_past_the_end() {
        let mut used = vec![false; 6];
        mark_used(&mut used, usize::MAX);
        assert_eq!(used, vec![false; 6]);
        mark_used(&mut used, 8);
        assert_eq!(used, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_error_search_with_huge_target_frequency() {
        let settings = PwmSettings {
            target_frequency: 1e25,
            ..PwmSettings::default()
        };
        let mut def = LoadDefinition::new("pwm", 0.02, 1e-5, LoadInput::Pwm(settings));
        optimize_harmonics_with(&mut def, 2, OptimizeStrategy::ErrorSearch).unwrap();
        let harmonics = &def.pwm().unwrap().harmonics;
        assert_eq!(harmonics[0].frequency, 1e25);
        assert!(harmonics.len() <= 2);
    }
}
