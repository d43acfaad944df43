//! Error types for the core value types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing or combining core values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Window whose start falls after its end.
    #[error("Invalid date window: start {start} is after end {end}")]
    InvalidWindow {
        /// Requested start.
        start: String,
        /// Requested end.
        end: String,
    },

    /// Unknown or malformed currency code.
    #[error("Invalid currency: {code}")]
    InvalidCurrency {
        /// The offending code.
        code: String,
    },

    /// Malformed tenor string.
    #[error("Invalid tenor '{input}': {reason}")]
    InvalidTenor {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Series dates are not strictly increasing.
    #[error("Series dates must be strictly increasing: {previous} followed by {next}")]
    UnorderedSeries {
        /// Earlier sample date.
        previous: String,
        /// Sample date that is not after `previous`.
        next: String,
    },

    /// Parallel arrays of different length.
    #[error("Length mismatch in {context}: {left} vs {right}")]
    LengthMismatch {
        /// Where the mismatch occurred.
        context: String,
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },

    /// A date present in one series is missing from the series it is combined with.
    #[error("Series misaligned: no sample on {date} in {context}")]
    SeriesMisaligned {
        /// The unmatched date.
        date: String,
        /// Which operand lacked the date.
        context: String,
    },

    /// Mathematical error (division by zero, non-finite result).
    #[error("Mathematical error: {reason}")]
    MathError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(context: impl Into<String>, left: usize, right: usize) -> Self {
        Self::LengthMismatch {
            context: context.into(),
            left,
            right,
        }
    }

    /// Creates a math error.
    #[must_use]
    pub fn math_error(reason: impl Into<String>) -> Self {
        Self::MathError {
            reason: reason.into(),
        }
    }
}
