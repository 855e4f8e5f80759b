//! Error types for load definition validation and store access.

use thiserror::Error;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Time grid errors (E001-E004)
    /// E001: End time is not a positive finite number
    NonPositiveEndTime,
    /// E002: Delta time is not a positive finite number
    NonPositiveDeltaTime,
    /// E003: Time grid yields fewer than two samples
    TooFewSamples,
    /// E004: Time grid yields more samples than the engine accepts
    TooManySamples,

    // Expression errors (E010)
    /// E010: Expression text is empty
    EmptyExpression,

    // Tabular errors (E020-E022)
    /// E020: Time and amplitude columns differ in length
    TabularLengthMismatch,
    /// E021: Fewer than two tabular points
    TooFewTabularPoints,
    /// E022: Tabular times are not strictly increasing
    NonMonotonicTime,

    // PWM errors (E030-E034)
    /// E030: Carrier frequency is not positive
    NonPositiveCarrierFrequency,
    /// E031: Target frequency is not positive
    NonPositiveTargetFrequency,
    /// E032: No harmonics declared
    EmptyHarmonics,
    /// E033: A harmonic frequency is not positive
    NonPositiveHarmonicFrequency,
    /// E034: Requested harmonic count is zero
    InvalidHarmonicCount,

    // Operation errors (E040-E051)
    /// E040: Operation requires a different input mode
    WrongInputMode,
    /// E050: Sample spacing of a series is not positive
    InvalidSampleSpacing,
    /// E051: Time and amplitude series differ in length
    SeriesLengthMismatch,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::NonPositiveEndTime => "E001",
            ErrorCode::NonPositiveDeltaTime => "E002",
            ErrorCode::TooFewSamples => "E003",
            ErrorCode::TooManySamples => "E004",
            ErrorCode::EmptyExpression => "E010",
            ErrorCode::TabularLengthMismatch => "E020",
            ErrorCode::TooFewTabularPoints => "E021",
            ErrorCode::NonMonotonicTime => "E022",
            ErrorCode::NonPositiveCarrierFrequency => "E030",
            ErrorCode::NonPositiveTargetFrequency => "E031",
            ErrorCode::EmptyHarmonics => "E032",
            ErrorCode::NonPositiveHarmonicFrequency => "E033",
            ErrorCode::InvalidHarmonicCount => "E034",
            ErrorCode::WrongInputMode => "E040",
            ErrorCode::InvalidSampleSpacing => "E050",
            ErrorCode::SeriesLengthMismatch => "E051",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the offending field (e.g., "input.harmonics\[2\].frequency").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a load definition.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors, in field order.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns true if validation passed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Converts into a `Result`, keeping the first error.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Errors from index-addressed access to a [`crate::LoadStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Index does not address a stored definition.
    #[error("load index {index} is out of range (store holds {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stored definitions.
        len: usize,
    },
}
