//! Error types for the signal backend.

use loadsynth_spec::{ErrorCode, ValidationError};
use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Parse-time expression errors.
///
/// Every variant names the offending token and its 1-based column.
/// Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Expression contains no tokens.
    #[error("expression is empty")]
    Empty,

    /// A character that starts no token.
    #[error("unexpected character '{ch}' at column {column}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// 1-based column.
        column: usize,
    },

    /// A numeric literal that does not parse.
    #[error("invalid number '{literal}' at column {column}")]
    InvalidNumber {
        /// Literal text.
        literal: String,
        /// 1-based column.
        column: usize,
    },

    /// A token where something else was expected.
    #[error("unexpected '{found}' at column {column}, expected {expected}")]
    UnexpectedToken {
        /// Token text.
        found: String,
        /// What the parser wanted.
        expected: &'static str,
        /// 1-based column.
        column: usize,
    },

    /// Input ended where more was expected.
    #[error("unexpected end of expression at column {column}, expected {expected}")]
    UnexpectedEnd {
        /// What the parser wanted.
        expected: &'static str,
        /// 1-based column just past the input.
        column: usize,
    },

    /// An opening parenthesis that is never closed.
    #[error("unclosed '(' at column {column}")]
    UnclosedParen {
        /// 1-based column of the '('.
        column: usize,
    },

    /// A closing parenthesis with no matching opener.
    #[error("unmatched ')' at column {column}")]
    UnmatchedParen {
        /// 1-based column of the ')'.
        column: usize,
    },

    /// Tokens left over after a complete expression.
    #[error("trailing '{found}' at column {column}")]
    TrailingInput {
        /// Token text.
        found: String,
        /// 1-based column.
        column: usize,
    },

    /// Nesting or an operator chain deeper than the parser accepts.
    #[error("expression nests too deeply at column {column}")]
    TooDeep {
        /// 1-based column where the limit was reached.
        column: usize,
    },

    /// A bare identifier that is neither `t` nor a constant.
    #[error("unknown identifier '{name}' at column {column}")]
    UnknownIdentifier {
        /// Identifier text.
        name: String,
        /// 1-based column.
        column: usize,
    },

    /// A call to a name with no function entry.
    #[error("unknown function '{name}' at column {column}")]
    UnknownFunction {
        /// Function name.
        name: String,
        /// 1-based column.
        column: usize,
    },

    /// A known function called with an unsupported argument count.
    #[error("function '{name}' at column {column} takes {expected} argument(s), got {found}")]
    ArityMismatch {
        /// Function name.
        name: String,
        /// Accepted argument counts (e.g. "1 to 4").
        expected: String,
        /// Supplied argument count.
        found: usize,
        /// 1-based column.
        column: usize,
    },
}

/// Errors from parsing pasted time/amplitude text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabularParseError {
    /// Input holds no data lines.
    #[error("no data to parse")]
    NoData,

    /// A line with a single field.
    #[error("line {line}: expected 2 columns, got 1")]
    MissingField {
        /// 1-based line number.
        line: usize,
    },

    /// A line with more than two fields.
    #[error("line {line}: expected 2 columns, got {found}")]
    TooManyFields {
        /// 1-based line number.
        line: usize,
        /// Number of fields found.
        found: usize,
    },

    /// A field that is not a finite number.
    #[error("line {line}: cannot parse {column} value '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// "time" or "amplitude".
        column: &'static str,
        /// Field text.
        value: String,
    },

    /// A time that does not exceed the previous one.
    #[error("line {line}: time {time} does not exceed previous time {previous}")]
    NonIncreasingTime {
        /// 1-based line number.
        line: usize,
        /// Time on the previous data line.
        previous: f64,
        /// Time on this line.
        time: f64,
    },

    /// Fewer than two data lines.
    #[error("need at least 2 data points, got {found}")]
    TooFewPoints {
        /// Number of data lines.
        found: usize,
    },
}

/// Errors that can occur during load synthesis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Expression failed to parse.
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Tabular text failed to parse.
    #[error("tabular data error: {0}")]
    Tabular(#[from] TabularParseError),

    /// Definition or operation inputs are invalid.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SignalError {
    /// Creates a validation error without a field path.
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(code, message))
    }

    /// Stable code for this error: the validation code, or a backend code.
    pub fn code(&self) -> &'static str {
        match self {
            SignalError::Expression(_) => "SIGNAL_001",
            SignalError::Tabular(_) => "SIGNAL_002",
            SignalError::Validation(err) => err.code.code(),
        }
    }
}
