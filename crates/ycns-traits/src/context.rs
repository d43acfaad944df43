//! Valuation context handed to every collaborator call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ycns_core::Date;

/// Cooperative cancellation flag shared between a caller and a running
/// attribution.
///
/// Cloning shares the flag. The engine polls it between dates of the
/// implied-curve replay.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Valuation context for one attribution request.
///
/// Moving the valuation date is how the implied-curve replay asks a
/// collaborator for that day's market state.
#[derive(Debug, Clone)]
pub struct ValuationContext {
    valuation_date: Date,
    cancellation: CancellationToken,
}

impl ValuationContext {
    /// Creates a context valued on `valuation_date`.
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            cancellation: CancellationToken::new(),
        }
    }

    /// Attaches a caller-owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Same context with the valuation date moved to `date`.
    #[must_use]
    pub fn with_valuation_date(&self, date: Date) -> Self {
        Self {
            valuation_date: date,
            cancellation: self.cancellation.clone(),
        }
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// The cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Shorthand for `self.cancellation().is_cancelled()`.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
