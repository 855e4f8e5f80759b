//! JSON output types for machine-readable CLI output.
//!
//! Every command's `--json` mode prints exactly one of these documents to
//! stdout.

use anyhow::{Context, Result};
use loadsynth_backend_signal::SignalError;
use loadsynth_spec::{PwmHarmonic, ValidationError};
use serde::Serialize;

/// Error codes for CLI operations.
///
/// Engine errors pass their own codes through (`E0xx`, `SIGNAL_xxx`).
pub mod error_codes {
    /// File could not be read or parsed
    pub const INPUT: &str = "CLI_001";
    /// Output file could not be written
    pub const OUTPUT: &str = "CLI_002";
    /// Command-line arguments are inconsistent
    pub const ARGUMENTS: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E030", "SIGNAL_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Creates an error from an `anyhow` chain, keeping every cause.
    pub fn from_anyhow(code: &str, err: &anyhow::Error) -> Self {
        Self::new(code, format!("{:#}", err))
    }
}

impl From<&ValidationError> for JsonError {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }
}

impl From<&SignalError> for JsonError {
    fn from(err: &SignalError) -> Self {
        match err {
            SignalError::Validation(inner) => inner.into(),
            other => Self::new(other.code(), other.to_string()),
        }
    }
}

/// Validation outcome for one definition.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateLoad {
    /// Definition name
    pub name: String,
    /// Input mode
    pub mode: String,
    /// Every validation error found
    pub errors: Vec<JsonError>,
}

/// Output of `validate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    /// True if every definition is valid
    pub success: bool,
    /// Per-definition results, in file order
    pub loads: Vec<ValidateLoad>,
    /// Errors that stopped validation before any definition was checked
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Generation outcome for one definition.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateLoad {
    /// Definition name
    pub name: String,
    /// Input mode
    pub mode: String,
    /// True if generation and spectrum analysis both succeeded
    pub success: bool,
    /// Number of samples generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    /// Smallest finite amplitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amplitude: Option<f64>,
    /// Largest finite amplitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amplitude: Option<f64>,
    /// Frequency of the largest non-DC spectrum bin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_frequency: Option<f64>,
    /// BLAKE3 hash of the amplitude samples (little-endian f64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude_hash: Option<String>,
    /// Harmonics after optimization, if it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonics: Option<Vec<PwmHarmonic>>,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Output of `generate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// True if every definition generated
    pub success: bool,
    /// Per-definition results, in file order
    pub loads: Vec<GenerateLoad>,
    /// File the generated loads were written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Errors outside any single definition
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// One `(t, value)` pair.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Point {
    /// Time in seconds
    pub t: f64,
    /// Value at `t`
    pub value: f64,
}

/// Output of `eval --json` and `table --json`.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesOutput {
    /// True if parsing succeeded
    pub success: bool,
    /// Evaluated or parsed points
    pub points: Vec<Point>,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl SeriesOutput {
    /// A successful result.
    pub fn success(points: Vec<Point>) -> Self {
        Self {
            success: true,
            points,
            error: None,
        }
    }

    /// A failed result.
    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            points: Vec::new(),
            error: Some(error),
        }
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}
