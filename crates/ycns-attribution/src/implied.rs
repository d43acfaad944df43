//! Node-level history of implied curves.
//!
//! Implied curve nodes have no quoted history. [`ImpliedNodeHistoryBuilder`]
//! rebuilds it by running curve construction once per calendar day of the
//! fetch window and harvesting each day's par rates into tenor buckets.
//!
//! Each day moves through `Pending -> Built | Skipped`. A skipped day
//! contributes nothing but does not stop the replay; skips on working days
//! are logged, weekend skips are expected and stay silent.

use tracing::{debug, warn};

use ycns_core::{Date, DateWindow, Tenor};
use ycns_traits::curves::{CurveConstructionConfig, ImpliedCurveResolver};
use ycns_traits::ValuationContext;

use crate::bucket::BucketCollection;
use crate::error::{AttributionError, AttributionResult};

/// Working-day test used to decide whether a failed day is worth a warning.
pub type WorkingDayPredicate = fn(Date) -> bool;

/// Monday to Friday. No holiday calendar.
pub fn is_working_day(date: Date) -> bool {
    date.is_weekday()
}

/// A day whose curve construction failed.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySkip {
    /// Replay date.
    pub date: Date,
    /// Failure reported by curve construction.
    pub reason: String,
    /// Whether the skip was logged (working days only).
    pub logged: bool,
}

/// Outcome of one replayed day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// Construction succeeded; `nodes` samples were added.
    Built {
        /// Replay date.
        date: Date,
        /// Number of tenors harvested.
        nodes: usize,
    },
    /// Construction failed and the day was skipped.
    Skipped(DaySkip),
}

impl DayOutcome {
    /// The day this outcome is for.
    pub fn date(&self) -> Date {
        match self {
            DayOutcome::Built { date, .. } => *date,
            DayOutcome::Skipped(skip) => skip.date,
        }
    }
}

/// Result of a completed replay.
#[derive(Debug, Clone)]
pub struct ImpliedHistory {
    /// Par-rate samples per tenor.
    pub buckets: BucketCollection<Tenor>,
    /// One outcome per visited day, in date order.
    pub outcomes: Vec<DayOutcome>,
}

impl ImpliedHistory {
    /// Days that were skipped.
    pub fn skips(&self) -> impl Iterator<Item = &DaySkip> {
        self.outcomes.iter().filter_map(|o| match o {
            DayOutcome::Skipped(skip) => Some(skip),
            DayOutcome::Built { .. } => None,
        })
    }

    /// Number of days that produced a curve.
    pub fn built_days(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DayOutcome::Built { .. }))
            .count()
    }
}

/// Replays implied curve construction over a window.
pub struct ImpliedNodeHistoryBuilder<'a> {
    resolver: &'a dyn ImpliedCurveResolver,
    construction: &'a CurveConstructionConfig,
    working_day: WorkingDayPredicate,
}

impl<'a> ImpliedNodeHistoryBuilder<'a> {
    /// A builder for curves constructed from `construction`.
    pub fn new(
        resolver: &'a dyn ImpliedCurveResolver,
        construction: &'a CurveConstructionConfig,
    ) -> Self {
        Self {
            resolver,
            construction,
            working_day: is_working_day,
        }
    }

    /// Replaces the working-day predicate.
    #[must_use]
    pub fn with_working_day_predicate(mut self, predicate: WorkingDayPredicate) -> Self {
        self.working_day = predicate;
        self
    }

    /// Visits every day of `window.fetch_window()` in increasing order.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the context's token is set before a day is visited;
    /// `NodeOrderMismatch` if a day's tenors are not strictly ascending.
    /// Construction failures never abort the replay.
    pub fn replay(
        &self,
        ctx: &ValuationContext,
        window: &DateWindow,
    ) -> AttributionResult<ImpliedHistory> {
        let mut buckets = BucketCollection::new();
        let mut outcomes = Vec::with_capacity(window.fetch_window().len_days());

        for date in window.fetch_window().days() {
            if ctx.is_cancelled() {
                return Err(AttributionError::Cancelled {
                    date: date.to_string(),
                });
            }

            let day_ctx = ctx.with_valuation_date(date);
            let data = match self.resolver.implied_curve_data(&day_ctx, self.construction) {
                Ok(data) => data,
                Err(e) => {
                    let logged = (self.working_day)(date);
                    if logged {
                        warn!(
                            date = %date,
                            construction = %self.construction.name,
                            error = %e,
                            "implied curve construction failed; skipping day"
                        );
                    }
                    outcomes.push(DayOutcome::Skipped(DaySkip {
                        date,
                        reason: e.to_string(),
                        logged,
                    }));
                    continue;
                }
            };

            if data.tenors().windows(2).any(|w| w[0] >= w[1]) {
                return Err(AttributionError::NodeOrderMismatch {
                    date: date.to_string(),
                    tenors: data
                        .tenors()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                });
            }

            for (tenor, par_rate) in data.iter() {
                buckets.add(date, &tenor, par_rate)?;
            }
            debug!(date = %date, nodes = data.len(), "implied curve built");
            outcomes.push(DayOutcome::Built {
                date,
                nodes: data.len(),
            });
        }

        Ok(ImpliedHistory { buckets, outcomes })
    }
}
