//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use ycns_attribution::AttributionError;
use ycns_config::ConfigError;
use ycns_traits::TraitError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A data file could not be loaded.
    #[error("Cannot load {}: {source}", path.display())]
    Data {
        /// Offending file.
        path: PathBuf,
        /// Loader failure.
        source: TraitError,
    },

    /// The data directory does not exist.
    #[error("Data directory not found: {}", .0.display())]
    MissingDataDirectory(PathBuf),

    /// The attribution run failed.
    #[error("Attribution failed: {0}")]
    Attribution(#[from] AttributionError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
