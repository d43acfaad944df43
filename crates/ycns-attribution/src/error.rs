//! Attribution error types.

use std::fmt;

use thiserror::Error;
use ycns_core::CoreError;
use ycns_traits::TraitError;

/// A specialized Result type for attribution runs.
pub type AttributionResult<T> = Result<T, AttributionError>;

/// Errors that abort an attribution run.
///
/// No partial matrix is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// The sensitivity bundle holds no vector for the curve.
    #[error("no sensitivity data for curve {curve}")]
    MissingSensitivityData {
        /// Curve that was looked up.
        curve: String,
    },

    /// Sensitivity vector length disagrees with the curve's bucket count.
    #[error("curve {curve}: expected {expected} sensitivities, got {actual}")]
    BucketCountMismatch {
        /// Curve being attributed.
        curve: String,
        /// Number of buckets (nodes or implied tenors).
        expected: usize,
        /// Length of the sensitivity vector.
        actual: usize,
    },

    /// One or more collaborator calls failed.
    #[error("upstream failure: {0}")]
    Upstream(UpstreamFailure),

    /// The conversion series lacks a date the observable series has.
    #[error("conversion series has no sample on {date}")]
    SeriesMisaligned {
        /// The unmatched date.
        date: String,
    },

    /// Tenors reported by curve construction are not strictly ascending.
    #[error("implied curve on {date} reported tenors out of order: {tenors}")]
    NodeOrderMismatch {
        /// Replay date.
        date: String,
        /// The tenors as reported.
        tenors: String,
    },

    /// The caller cancelled the run.
    #[error("attribution cancelled before {date}")]
    Cancelled {
        /// First date that was not processed.
        date: String,
    },

    /// Invalid value construction.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for AttributionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SeriesMisaligned { date, .. } => AttributionError::SeriesMisaligned { date },
            other => AttributionError::Core(other),
        }
    }
}

impl From<UpstreamFailure> for AttributionError {
    fn from(failure: UpstreamFailure) -> Self {
        AttributionError::Upstream(failure)
    }
}

impl AttributionError {
    /// A single-cause upstream failure.
    pub fn upstream(collaborator: Collaborator, context: impl Into<String>, error: TraitError) -> Self {
        AttributionError::Upstream(UpstreamFailure::default().with_cause(UpstreamCause {
            collaborator,
            context: context.into(),
            error,
        }))
    }
}

/// The collaborator a failed call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Block curve sensitivity pricing.
    SensitivityCalculator,
    /// Curve node specification lookup.
    CurveSpecification,
    /// Currency pair metadata.
    CurrencyPairs,
    /// Historical series repository.
    HistoricalMarketData,
    /// Snapshot FX matrix.
    FxMatrix,
    /// Return-series routine.
    ReturnSeries,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::SensitivityCalculator => "sensitivity calculator",
            Collaborator::CurveSpecification => "curve specification",
            Collaborator::CurrencyPairs => "currency pairs",
            Collaborator::HistoricalMarketData => "historical market data",
            Collaborator::FxMatrix => "fx matrix",
            Collaborator::ReturnSeries => "return series",
        };
        f.write_str(name)
    }
}

/// One failed collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCause {
    /// Who failed.
    pub collaborator: Collaborator,
    /// What was being asked for.
    pub context: String,
    /// The collaborator's error.
    pub error: TraitError,
}

impl fmt::Display for UpstreamCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}: {}", self.collaborator, self.error)
        } else {
            write!(f, "{} ({}): {}", self.collaborator, self.context, self.error)
        }
    }
}

/// Every collaborator failure that contributed to an aborted run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamFailure {
    causes: Vec<UpstreamCause>,
}

impl UpstreamFailure {
    /// Adds a cause.
    #[must_use]
    pub fn with_cause(mut self, cause: UpstreamCause) -> Self {
        self.causes.push(cause);
        self
    }

    /// Adds a cause if `error` is present.
    #[must_use]
    pub fn with_err(
        self,
        collaborator: Collaborator,
        context: impl Into<String>,
        error: Option<TraitError>,
    ) -> Self {
        match error {
            Some(error) => self.with_cause(UpstreamCause {
                collaborator,
                context: context.into(),
                error,
            }),
            None => self,
        }
    }

    /// Appends every cause of `other`.
    #[must_use]
    pub fn merge(mut self, other: UpstreamFailure) -> Self {
        self.causes.extend(other.causes);
        self
    }

    /// Contributing causes in the order they were recorded.
    pub fn causes(&self) -> &[UpstreamCause] {
        &self.causes
    }

    /// Whether any cause was recorded.
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    /// Collaborators that failed.
    pub fn collaborators(&self) -> Vec<Collaborator> {
        self.causes.iter().map(|c| c.collaborator).collect()
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .causes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}
