//! # YCNS Traits
//!
//! Trait definitions for the collaborators an attribution run depends on.
//!
//! The attribution engine never prices, bootstraps or stores anything
//! itself. It reaches the outside world through these traits only:
//!
//! - [`sensitivity`]: Block curve sensitivities for a position
//! - [`curves`]: Curve node specifications and implied-curve construction
//! - [`market_data`]: Historical series, FX rates, currency pair metadata,
//!   return-series computation
//! - [`context`]: Valuation context passed to every call, with the
//!   cooperative cancellation token
//!
//! All calls are synchronous and return `Result<_, TraitError>`; timeouts
//! and retries belong to the implementations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod curves;
pub mod error;
pub mod ids;
pub mod market_data;
pub mod sensitivity;

// Re-export commonly used types
pub use context::{CancellationToken, ValuationContext};
pub use error::TraitError;
pub use ids::*;
