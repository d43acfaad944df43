//! # ycns-attribution
//!
//! Historical attribution of a position's curve PnL to yield curve nodes.
//!
//! Given a point-in-time sensitivity vector and the history of each node's
//! observable, the engine produces one daily PnL series per node. The
//! series sum to the curve-driven PnL of the position.
//!
//! - **Matching**: [`SensitivityBucketMatcher`] picks a curve's vector out
//!   of a multi-currency bundle
//! - **Trimming**: [`SeriesTrimmer`] keeps one sample before the window
//! - **Returns**: [`ReturnConverter`] with optional FX pre-multiplication
//! - **Implied curves**: [`ImpliedNodeHistoryBuilder`] replays curve
//!   construction day by day, tolerating failed days
//! - **Orchestration**: [`AttributionOrchestrator`] ties it together
//!
//! ## Example
//!
//! ```ignore
//! use ycns_attribution::prelude::*;
//!
//! let orchestrator = AttributionOrchestrator::new(collaborators);
//! let request = AttributionRequest::from_config(&config)?;
//! let matrix = orchestrator.attribute(&ctx, &request)?;
//! let total = matrix.total_series();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribution;
pub mod bucket;
mod error;
pub mod fx;
pub mod implied;
pub mod matcher;
pub mod returns;
pub mod trim;

pub use attribution::{
    Attribution, AttributionOrchestrator, AttributionRequest, Collaborators, CurveIdentity,
};
pub use bucket::{BucketCollection, BucketSeries};
pub use error::{
    AttributionError, AttributionResult, Collaborator, UpstreamCause, UpstreamFailure,
};
pub use fx::{FxConversionMode, PnlConversion};
pub use implied::{DayOutcome, DaySkip, ImpliedHistory, ImpliedNodeHistoryBuilder};
pub use matcher::{BucketMatch, SensitivityBucketMatcher};
pub use returns::{AbsoluteReturnCalculator, RelativeReturnCalculator, ReturnConverter};
pub use trim::SeriesTrimmer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attribution::*;
    pub use crate::fx::FxConversionMode;
    pub use crate::returns::calculator_for;
    pub use crate::{AttributionError, AttributionResult};
}
