//! Error types for collaborator calls.

use thiserror::Error;

/// Common error type returned by every collaborator trait.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TraitError {
    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Source not available
    #[error("source not available: {0}")]
    SourceNotAvailable(String),

    /// Market data missing for the request
    #[error("missing market data: {0}")]
    MissingData(String),

    /// Pricing or sensitivity calculation failed
    #[error("calculation failed: {0}")]
    CalculationFailed(String),

    /// Curve construction failed
    #[error("curve construction failed: {0}")]
    CurveConstructionFailed(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

impl From<ycns_core::CoreError> for TraitError {
    fn from(e: ycns_core::CoreError) -> Self {
        TraitError::InvalidInput(e.to_string())
    }
}
