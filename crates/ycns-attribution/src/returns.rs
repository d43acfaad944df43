//! Price-to-return conversion.
//!
//! [`ReturnConverter`] optionally multiplies an observable series by a
//! conversion series before handing it to the external return routine.
//! Two stock routines are provided for callers without one of their own.

use std::sync::Arc;

use ycns_config::ReturnKind;
use ycns_core::DateSeries;
use ycns_traits::market_data::ReturnSeriesCalculator;
use ycns_traits::{TraitError, ValuationContext};

use crate::error::{AttributionError, AttributionResult, Collaborator};

/// Converts observable series into return series.
#[derive(Clone, Copy)]
pub struct ReturnConverter<'a> {
    calculator: &'a dyn ReturnSeriesCalculator,
}

impl<'a> ReturnConverter<'a> {
    /// A converter delegating to `calculator`.
    pub fn new(calculator: &'a dyn ReturnSeriesCalculator) -> Self {
        Self { calculator }
    }

    /// Return series of `series`, pre-multiplied by `conversion` when given.
    ///
    /// # Errors
    ///
    /// `SeriesMisaligned` if `conversion` lacks a date of `series`;
    /// `Upstream` if the return routine fails.
    pub fn convert(
        &self,
        ctx: &ValuationContext,
        series: &DateSeries,
        conversion: Option<&DateSeries>,
    ) -> AttributionResult<DateSeries> {
        let converted;
        let input = match conversion {
            Some(conversion) => {
                converted = series.multiply_aligned(conversion, "conversion series")?;
                &converted
            }
            None => series,
        };
        self.calculator
            .return_series(ctx, input)
            .map_err(|e| AttributionError::upstream(Collaborator::ReturnSeries, "", e))
    }
}

impl std::fmt::Debug for ReturnConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnConverter").finish_non_exhaustive()
    }
}

/// `v[t] - v[t-1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteReturnCalculator;

impl ReturnSeriesCalculator for AbsoluteReturnCalculator {
    fn return_series(
        &self,
        _ctx: &ValuationContext,
        series: &DateSeries,
    ) -> Result<DateSeries, TraitError> {
        let returns = series
            .dates()
            .windows(2)
            .zip(series.values().windows(2))
            .map(|(d, v)| (d[1], v[1] - v[0]));
        Ok(DateSeries::from_pairs(returns)?)
    }
}

/// `v[t] / v[t-1] - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeReturnCalculator;

impl ReturnSeriesCalculator for RelativeReturnCalculator {
    fn return_series(
        &self,
        _ctx: &ValuationContext,
        series: &DateSeries,
    ) -> Result<DateSeries, TraitError> {
        let mut returns = Vec::with_capacity(series.len().saturating_sub(1));
        for (d, v) in series.dates().windows(2).zip(series.values().windows(2)) {
            if v[0] == 0.0 {
                return Err(TraitError::CalculationFailed(format!(
                    "zero observation on {} has no relative return",
                    d[0]
                )));
            }
            returns.push((d[1], v[1] / v[0] - 1.0));
        }
        Ok(DateSeries::from_pairs(returns)?)
    }
}

/// The stock calculator for `kind`.
pub fn calculator_for(kind: ReturnKind) -> Arc<dyn ReturnSeriesCalculator> {
    match kind {
        ReturnKind::Absolute => Arc::new(AbsoluteReturnCalculator),
        ReturnKind::Relative => Arc::new(RelativeReturnCalculator),
    }
}
