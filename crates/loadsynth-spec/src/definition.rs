//! Load definition types.
//!
//! A [`LoadDefinition`] is one user-declared excitation: a uniform time grid
//! plus exactly one authoritative input group ([`LoadInput`]). The computed
//! arrays live in [`ComputedSeries`] and are overwritten on every generation.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError};

/// Upper bound on the number of samples a single definition may produce.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Absorbs floating-point error in `end_time / delta_time` (e.g. `0.3 / 0.1`).
const SAMPLE_COUNT_EPSILON: f64 = 1e-9;

/// Default PWM carrier frequency in Hz.
pub const DEFAULT_CARRIER_FREQUENCY: f64 = 10_000.0;
/// Default PWM output amplitude.
pub const DEFAULT_OUTPUT_AMPLITUDE: f64 = 1_000.0;
/// Default PWM optimizer target frequency in Hz.
pub const DEFAULT_TARGET_FREQUENCY: f64 = 50.0;

/// Which input group of a definition is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// A math expression in `t`.
    Expression,
    /// A pasted time/amplitude table.
    Tabular,
    /// A pulse-width-modulation description.
    Pwm,
}

impl InputMode {
    /// Returns the input mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Expression => "expression",
            InputMode::Tabular => "tabular",
            InputMode::Pwm => "pwm",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expression" => Ok(InputMode::Expression),
            "tabular" => Ok(InputMode::Tabular),
            "pwm" => Ok(InputMode::Pwm),
            _ => Err(format!("unknown input mode: {}", s)),
        }
    }
}

/// One sinusoidal component of a PWM target signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PwmHarmonic {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Signed amplitude.
    pub amplitude: f64,
    /// Phase in degrees.
    #[serde(default)]
    pub phase: f64,
}

impl PwmHarmonic {
    /// Creates a new harmonic.
    pub fn new(frequency: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
        }
    }

    /// Phase normalized into `[0, 360)` degrees, for display.
    pub fn display_phase(&self) -> f64 {
        let p = self.phase.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if p >= 360.0 {
            0.0
        } else {
            p
        }
    }

    /// Phase in radians.
    pub fn phase_radians(&self) -> f64 {
        self.phase.to_radians()
    }
}

/// PWM input group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PwmSettings {
    /// Triangular carrier frequency in Hz.
    #[serde(default = "default_carrier_frequency")]
    pub carrier_frequency: f64,
    /// Switched output amplitude (signed).
    #[serde(default = "default_output_amplitude")]
    pub output_amplitude: f64,
    /// `true` switches between `±output_amplitude`, `false` between `0` and `output_amplitude`.
    #[serde(default = "default_bipolar")]
    pub bipolar: bool,
    /// Fundamental frequency used by the harmonic optimizer, in Hz.
    #[serde(default = "default_target_frequency")]
    pub target_frequency: f64,
    /// Target signal components, in insertion order.
    #[serde(default)]
    pub harmonics: Vec<PwmHarmonic>,
}

fn default_carrier_frequency() -> f64 {
    DEFAULT_CARRIER_FREQUENCY
}

fn default_output_amplitude() -> f64 {
    DEFAULT_OUTPUT_AMPLITUDE
}

fn default_bipolar() -> bool {
    true
}

fn default_target_frequency() -> f64 {
    DEFAULT_TARGET_FREQUENCY
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            carrier_frequency: DEFAULT_CARRIER_FREQUENCY,
            output_amplitude: DEFAULT_OUTPUT_AMPLITUDE,
            bipolar: true,
            target_frequency: DEFAULT_TARGET_FREQUENCY,
            harmonics: Vec::new(),
        }
    }
}

impl PwmSettings {
    /// Sets the harmonics.
    pub fn with_harmonics(mut self, harmonics: Vec<PwmHarmonic>) -> Self {
        self.harmonics = harmonics;
        self
    }

    /// Highest harmonic frequency, or `None` if there are no harmonics.
    pub fn max_harmonic_frequency(&self) -> Option<f64> {
        self.harmonics
            .iter()
            .map(|h| h.frequency)
            .fold(None, |acc, f| Some(acc.map_or(f, |a: f64| a.max(f))))
    }
}

/// The authoritative input group of a load definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoadInput {
    /// Math expression in `t`, parsed at generation time.
    Expression {
        /// Expression text.
        expression: String,
    },
    /// Pasted time/amplitude table.
    Tabular {
        /// Knot times, strictly increasing.
        times: Vec<f64>,
        /// Amplitude at each knot.
        amplitudes: Vec<f64>,
    },
    /// Pulse-width-modulation description.
    Pwm(PwmSettings),
}

impl LoadInput {
    /// Creates an expression input.
    pub fn expression(expression: impl Into<String>) -> Self {
        LoadInput::Expression {
            expression: expression.into(),
        }
    }

    /// Creates a tabular input.
    pub fn tabular(times: Vec<f64>, amplitudes: Vec<f64>) -> Self {
        LoadInput::Tabular { times, amplitudes }
    }

    /// Returns the input mode discriminant.
    pub fn mode(&self) -> InputMode {
        match self {
            LoadInput::Expression { .. } => InputMode::Expression,
            LoadInput::Tabular { .. } => InputMode::Tabular,
            LoadInput::Pwm(_) => InputMode::Pwm,
        }
    }
}

/// Arrays derived by generation and spectrum analysis.
///
/// Non-finite samples survive a JSON round trip; see the `samples` module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedSeries {
    /// Sample times, `t_i = i * delta_time`.
    #[serde(default, with = "crate::samples")]
    pub time: Vec<f64>,
    /// Generated amplitude at each sample time.
    #[serde(default, with = "crate::samples")]
    pub amplitude: Vec<f64>,
    /// Unscaled PWM target signal; `None` outside PWM mode.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::samples::option"
    )]
    pub target: Option<Vec<f64>>,
    /// Spectrum bin frequencies in Hz.
    #[serde(default, with = "crate::samples")]
    pub fft_frequency: Vec<f64>,
    /// Single-sided amplitude spectrum.
    #[serde(default, with = "crate::samples")]
    pub fft_magnitude: Vec<f64>,
}

impl ComputedSeries {
    /// Returns true if nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
            && self.amplitude.is_empty()
            && self.target.is_none()
            && self.fft_frequency.is_empty()
            && self.fft_magnitude.is_empty()
    }

    /// Returns true if a spectrum has been computed.
    pub fn has_spectrum(&self) -> bool {
        !self.fft_frequency.is_empty()
    }
}

/// One user-declared excitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadDefinition {
    /// Display name.
    pub name: String,
    /// Opaque association to an external named region.
    #[serde(default)]
    pub group_name: String,
    /// End of the time grid in seconds.
    pub end_time: f64,
    /// Sample spacing in seconds.
    pub delta_time: f64,
    /// Authoritative input group.
    pub input: LoadInput,
    /// Derived arrays, overwritten on every generation.
    #[serde(default, skip_serializing_if = "ComputedSeries::is_empty")]
    pub computed: ComputedSeries,
}

impl LoadDefinition {
    /// Creates a new definition with empty computed arrays.
    pub fn new(name: impl Into<String>, end_time: f64, delta_time: f64, input: LoadInput) -> Self {
        Self {
            name: name.into(),
            group_name: String::new(),
            end_time,
            delta_time,
            input,
            computed: ComputedSeries::default(),
        }
    }

    /// Sets the group name.
    pub fn with_group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// Parses a definition from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the definition to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns the input mode.
    pub fn input_mode(&self) -> InputMode {
        self.input.mode()
    }

    /// Returns the PWM settings if this is a PWM definition.
    pub fn pwm(&self) -> Option<&PwmSettings> {
        match &self.input {
            LoadInput::Pwm(settings) => Some(settings),
            _ => None,
        }
    }

    /// Returns mutable PWM settings if this is a PWM definition.
    pub fn pwm_mut(&mut self) -> Option<&mut PwmSettings> {
        match &mut self.input {
            LoadInput::Pwm(settings) => Some(settings),
            _ => None,
        }
    }

    /// Number of samples on the time grid.
    ///
    /// See [`sample_count`].
    pub fn sample_count(&self) -> Result<usize, ValidationError> {
        sample_count(self.end_time, self.delta_time)
    }
}

/// Number of samples `N = floor(end_time / delta_time) + 1` on a uniform grid.
///
/// Fails when either value is not a positive finite number, when `N < 2`, or
/// when `N` exceeds [`MAX_SAMPLES`].
pub fn sample_count(end_time: f64, delta_time: f64) -> Result<usize, ValidationError> {
    if !end_time.is_finite() || end_time <= 0.0 {
        return Err(ValidationError::with_path(
            ErrorCode::NonPositiveEndTime,
            format!("end time must be a positive number, got {}", end_time),
            "end_time",
        ));
    }
    if !delta_time.is_finite() || delta_time <= 0.0 {
        return Err(ValidationError::with_path(
            ErrorCode::NonPositiveDeltaTime,
            format!("delta time must be a positive number, got {}", delta_time),
            "delta_time",
        ));
    }

    let steps = (end_time / delta_time + SAMPLE_COUNT_EPSILON).floor();
    if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
        return Err(ValidationError::with_path(
            ErrorCode::TooManySamples,
            format!(
                "end time {} with delta time {} produces more than {} samples",
                end_time, delta_time, MAX_SAMPLES
            ),
            "delta_time",
        ));
    }

    let n = steps as usize + 1;
    if n < 2 {
        return Err(ValidationError::with_path(
            ErrorCode::TooFewSamples,
            format!(
                "end time {} must be at least one delta time ({}) long",
                end_time, delta_time
            ),
            "end_time",
        ));
    }

    Ok(n)
}
