//! Main entry points for load generation.
//!
//! Every operation validates first and only writes `def.computed` once the
//! whole result is ready, so a failed call leaves the previous arrays intact.

use loadsynth_spec::validation::validate_definition;
use loadsynth_spec::{ComputedSeries, LoadDefinition, LoadInput};

use crate::error::SignalResult;
use crate::expr::Expr;
use crate::pwm;
use crate::spectrum::compute_spectrum;
use crate::tabular::resample;

/// Uniform sample times `t_i = i·delta_time` for `i = 0..n`.
pub fn time_grid(n: usize, delta_time: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * delta_time).collect()
}

/// Samples the definition on its time grid.
///
/// Replaces `time`, `amplitude`, and `target`, and clears any previous
/// spectrum. `target` is set only for PWM definitions.
///
/// # Errors
/// Returns the first validation error, or an expression parse error.
pub fn generate(def: &mut LoadDefinition) -> SignalResult<()> {
    validate_definition(def).into_result()?;

    let n = def.sample_count()?;
    let time = time_grid(n, def.delta_time);

    let (amplitude, target) = match &def.input {
        LoadInput::Expression { expression } => {
            let expr = Expr::parse(expression)?;
            log::debug!(
                "parsed expression '{}' (time dependent: {})",
                expr.source(),
                expr.is_time_dependent()
            );
            (time.iter().map(|&t| expr.eval(t)).collect(), None)
        }
        LoadInput::Tabular { times, amplitudes } => (
            time.iter().map(|&t| resample(times, amplitudes, t)).collect(),
            None,
        ),
        LoadInput::Pwm(settings) => {
            let output = pwm::synthesize(settings, &time);
            (output.amplitude, Some(output.target))
        }
    };

    warn_non_finite(&def.name, &amplitude);
    log::info!(
        "generated '{}' ({} mode, {} samples)",
        def.name,
        def.input_mode(),
        n
    );

    def.computed = ComputedSeries {
        time,
        amplitude,
        target,
        fft_frequency: Vec::new(),
        fft_magnitude: Vec::new(),
    };
    Ok(())
}

/// Computes the spectrum of the generated amplitude into `fft_frequency`
/// and `fft_magnitude`.
///
/// Nothing generated yet (or a single sample) gives an empty spectrum.
pub fn compute_fft(def: &mut LoadDefinition) -> SignalResult<()> {
    let spectrum = compute_spectrum(&def.computed.time, &def.computed.amplitude)?;
    log::debug!(
        "spectrum of '{}': {} bins at {} Hz",
        def.name,
        spectrum.len(),
        spectrum.resolution
    );
    def.computed.fft_frequency = spectrum.frequency;
    def.computed.fft_magnitude = spectrum.magnitude;
    Ok(())
}

/// Generates and then computes the spectrum.
pub fn refresh(def: &mut LoadDefinition) -> SignalResult<()> {
    generate(def)?;
    compute_fft(def)
}

fn warn_non_finite(name: &str, amplitude: &[f64]) {
    let bad = amplitude.iter().filter(|v| !v.is_finite()).count();
    if bad > 0 {
        log::warn!(
            "'{}' has {} non-finite sample(s) out of {}",
            name,
            bad,
            amplitude.len()
        );
    }
}
