//! Currency conversion of attributed PnL.
//!
//! Two materially different policies exist and are kept apart:
//!
//! - **Historical spot**: each PnL sample is divided by the conversion
//!   series value on the same date.
//! - **Snapshot**: one FX rate as of the valuation date scales the whole
//!   series.
//!
//! No output currency, or an output currency equal to the native one,
//! means no conversion at all.

use tracing::debug;

use ycns_core::{Currency, DateSeries, DateWindow, UnorderedCurrencyPair};
use ycns_traits::market_data::{CurrencyPairSource, FxMatrixSource, HistoricalMarketData};
use ycns_traits::ValuationContext;

use crate::error::{AttributionError, AttributionResult, Collaborator};

/// How PnL is converted when the output currency differs from the native one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FxConversionMode {
    /// Divide each sample by the same-date conversion value.
    HistoricalSpot,
    /// Scale by one snapshot rate.
    #[default]
    Snapshot,
}

impl FxConversionMode {
    /// Mode selected by a `use_historical_spot` flag.
    pub fn from_flag(use_historical_spot: bool) -> Self {
        if use_historical_spot {
            FxConversionMode::HistoricalSpot
        } else {
            FxConversionMode::Snapshot
        }
    }
}

/// The target currency if converting from `native` is required.
pub fn conversion_required(native: Currency, output: Option<Currency>) -> Option<Currency> {
    output.filter(|out| *out != native)
}

/// A resolved conversion, ready to apply to every bucket's PnL.
#[derive(Debug, Clone, PartialEq)]
pub enum PnlConversion {
    /// Leave PnL untouched.
    Identity,
    /// Divide by the same-date value of this series.
    HistoricalSpot(DateSeries),
    /// Multiply by this rate.
    Snapshot(f64),
}

impl PnlConversion {
    /// Converts one bucket's PnL.
    ///
    /// Under historical spot, PnL dates with no spot sample are dropped.
    ///
    /// # Errors
    ///
    /// `Core` if the spot series holds a zero rate.
    pub fn apply(&self, pnl: DateSeries) -> AttributionResult<DateSeries> {
        match self {
            PnlConversion::Identity => Ok(pnl),
            PnlConversion::HistoricalSpot(series) => {
                for date in pnl.dates().iter().filter(|d| series.value_on(**d).is_none()) {
                    debug!(date = %date, "no historical spot sample; dropping PnL date");
                }
                Ok(pnl.multiply_common(&series.reciprocal()?))
            }
            PnlConversion::Snapshot(rate) => Ok(pnl.scale(*rate)),
        }
    }

    /// Whether this conversion changes anything.
    pub fn is_identity(&self) -> bool {
        matches!(self, PnlConversion::Identity)
    }
}

/// Resolves FX inputs against the market data collaborators.
pub struct FxResolver<'a> {
    pairs: &'a dyn CurrencyPairSource,
    history: &'a dyn HistoricalMarketData,
    matrix: &'a dyn FxMatrixSource,
}

impl<'a> FxResolver<'a> {
    /// Creates a resolver.
    pub fn new(
        pairs: &'a dyn CurrencyPairSource,
        history: &'a dyn HistoricalMarketData,
        matrix: &'a dyn FxMatrixSource,
    ) -> Self {
        Self {
            pairs,
            history,
            matrix,
        }
    }

    /// History of `output` units per unit of `native` over `window`.
    ///
    /// The series is requested for the market-convention pair and inverted
    /// when the convention quotes `output` as the base currency.
    ///
    /// # Errors
    ///
    /// `Upstream` if the pair lookup or the series fetch fails.
    pub fn conversion_series(
        &self,
        ctx: &ValuationContext,
        native: Currency,
        output: Currency,
        window: &DateWindow,
    ) -> AttributionResult<DateSeries> {
        let unordered = UnorderedCurrencyPair::of(native, output);
        let pair = self.pairs.currency_pair(&unordered).map_err(|e| {
            AttributionError::upstream(Collaborator::CurrencyPairs, unordered.to_string(), e)
        })?;
        let series = self
            .history
            .fx_series(ctx, &pair, window)
            .map_err(|e| {
                AttributionError::upstream(Collaborator::HistoricalMarketData, pair.code(), e)
            })?;
        debug!(pair = %pair, native = %native, output = %output, samples = series.len(), "conversion series loaded");
        if pair.base == native {
            Ok(series)
        } else {
            Ok(series.reciprocal()?)
        }
    }

    /// Snapshot rate converting `native` into `output`.
    ///
    /// # Errors
    ///
    /// `Upstream` if the FX matrix has no rate.
    pub fn snapshot_rate(
        &self,
        ctx: &ValuationContext,
        native: Currency,
        output: Currency,
    ) -> AttributionResult<f64> {
        self.matrix.fx_rate(ctx, native, output).map_err(|e| {
            AttributionError::upstream(
                Collaborator::FxMatrix,
                format!("{native}->{output}"),
                e,
            )
        })
    }

    /// The conversion to apply to PnL expressed in `native`.
    ///
    /// # Errors
    ///
    /// `Upstream` if a required FX input cannot be obtained.
    pub fn pnl_conversion(
        &self,
        ctx: &ValuationContext,
        native: Currency,
        output: Option<Currency>,
        mode: FxConversionMode,
        window: &DateWindow,
    ) -> AttributionResult<PnlConversion> {
        let Some(output) = conversion_required(native, output) else {
            return Ok(PnlConversion::Identity);
        };
        match mode {
            FxConversionMode::HistoricalSpot => Ok(PnlConversion::HistoricalSpot(
                self.conversion_series(ctx, native, output, window)?,
            )),
            FxConversionMode::Snapshot => Ok(PnlConversion::Snapshot(
                self.snapshot_rate(ctx, native, output)?,
            )),
        }
    }
}
