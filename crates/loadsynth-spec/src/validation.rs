//! Load definition validation.
//!
//! Validation collects every problem it finds so callers can surface them
//! together. Generation only needs the first one; see
//! [`ValidationResult::into_result`].

use crate::definition::{sample_count, LoadDefinition, LoadInput, PwmSettings};
use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// Validates a definition for generation.
///
/// Checks the time grid and the authoritative input group. Expression text is
/// only checked for emptiness here; it is parsed at generation time.
pub fn validate_definition(def: &LoadDefinition) -> ValidationResult {
    let mut result = ValidationResult::success();

    if let Err(err) = sample_count(def.end_time, def.delta_time) {
        result.push(err);
    }

    match &def.input {
        LoadInput::Expression { expression } => {
            if expression.trim().is_empty() {
                result.push(ValidationError::with_path(
                    ErrorCode::EmptyExpression,
                    "expression cannot be empty",
                    "input.expression",
                ));
            }
        }
        LoadInput::Tabular { times, amplitudes } => {
            if let Err(err) = validate_tabular(times, amplitudes) {
                result.push(err);
            }
        }
        LoadInput::Pwm(settings) => validate_pwm(settings, &mut result),
    }

    result
}

/// Validates a time/amplitude table.
///
/// Columns must have equal length of at least two, and times must be strictly
/// increasing. Duplicate or decreasing times are rejected, never merged.
pub fn validate_tabular(times: &[f64], amplitudes: &[f64]) -> Result<(), ValidationError> {
    if times.len() != amplitudes.len() {
        return Err(ValidationError::with_path(
            ErrorCode::TabularLengthMismatch,
            format!(
                "tabular data has {} times but {} amplitudes",
                times.len(),
                amplitudes.len()
            ),
            "input.amplitudes",
        ));
    }
    if times.len() < 2 {
        return Err(ValidationError::with_path(
            ErrorCode::TooFewTabularPoints,
            format!("tabular data needs at least 2 points, got {}", times.len()),
            "input.times",
        ));
    }
    for (i, pair) in times.windows(2).enumerate() {
        // NaN compares as None and fails too
        if pair[1].partial_cmp(&pair[0]) != Some(std::cmp::Ordering::Greater) {
            return Err(ValidationError::with_path(
                ErrorCode::NonMonotonicTime,
                format!(
                    "times must be strictly increasing: {} follows {}",
                    pair[1], pair[0]
                ),
                format!("input.times[{}]", i + 1),
            ));
        }
    }
    Ok(())
}

fn validate_pwm(settings: &PwmSettings, result: &mut ValidationResult) {
    if !settings.carrier_frequency.is_finite() || settings.carrier_frequency <= 0.0 {
        result.push(ValidationError::with_path(
            ErrorCode::NonPositiveCarrierFrequency,
            format!(
                "carrier frequency must be positive, got {}",
                settings.carrier_frequency
            ),
            "input.carrier_frequency",
        ));
    }
    if let Err(err) = validate_target_frequency(settings) {
        result.push(err);
    }
    if settings.harmonics.is_empty() {
        result.push(ValidationError::with_path(
            ErrorCode::EmptyHarmonics,
            "at least one harmonic is required",
            "input.harmonics",
        ));
    }
    for (i, harmonic) in settings.harmonics.iter().enumerate() {
        if !harmonic.frequency.is_finite() || harmonic.frequency <= 0.0 {
            result.push(ValidationError::with_path(
                ErrorCode::NonPositiveHarmonicFrequency,
                format!(
                    "harmonic frequency must be positive, got {}",
                    harmonic.frequency
                ),
                format!("input.harmonics[{}].frequency", i),
            ));
        }
    }
}

/// Validates the optimizer target frequency.
pub fn validate_target_frequency(settings: &PwmSettings) -> Result<(), ValidationError> {
    if !settings.target_frequency.is_finite() || settings.target_frequency <= 0.0 {
        return Err(ValidationError::with_path(
            ErrorCode::NonPositiveTargetFrequency,
            format!(
                "target frequency must be positive, got {}",
                settings.target_frequency
            ),
            "input.target_frequency",
        ));
    }
    Ok(())
}
