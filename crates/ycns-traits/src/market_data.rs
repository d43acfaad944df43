//! Market data traits.
//!
//! These traits define interfaces for market data providers:
//! - [`HistoricalMarketData`]: Curve node and FX rate histories
//! - [`FxMatrixSource`]: Snapshot FX rates
//! - [`CurrencyPairSource`]: Market quoting convention of a currency pair
//! - [`ReturnSeriesCalculator`]: Price-to-return conversion

use crate::context::ValuationContext;
use crate::curves::CurveNode;
use crate::error::TraitError;
use ycns_core::{Currency, CurrencyPair, DateSeries, DateWindow, UnorderedCurrencyPair};

// =============================================================================
// HISTORICAL SERIES
// =============================================================================

/// Trait for historical market data repositories.
pub trait HistoricalMarketData: Send + Sync {
    /// History of a curve node's quote over `window`.
    fn curve_node_series(
        &self,
        ctx: &ValuationContext,
        node: &CurveNode,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError>;

    /// History of an FX rate, quoted as units of `pair.quote` per `pair.base`.
    fn fx_series(
        &self,
        ctx: &ValuationContext,
        pair: &CurrencyPair,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError>;
}

// =============================================================================
// FX SNAPSHOT
// =============================================================================

/// Trait for snapshot FX rate providers.
pub trait FxMatrixSource: Send + Sync {
    /// Units of `to` per one unit of `from`, as of the valuation date.
    fn fx_rate(
        &self,
        ctx: &ValuationContext,
        from: Currency,
        to: Currency,
    ) -> Result<f64, TraitError>;
}

// =============================================================================
// CURRENCY PAIR METADATA
// =============================================================================

/// Trait for currency pair metadata lookups.
pub trait CurrencyPairSource: Send + Sync {
    /// Market quoting order of an unordered pair.
    fn currency_pair(&self, pair: &UnorderedCurrencyPair) -> Result<CurrencyPair, TraitError>;
}

// =============================================================================
// RETURN SERIES
// =============================================================================

/// Trait for return-series routines.
///
/// Implementations return one sample fewer than their input: the sample
/// dated `t` is the move from the previous observation to `t`.
pub trait ReturnSeriesCalculator: Send + Sync {
    /// Convert an observable series into its return series.
    fn return_series(
        &self,
        ctx: &ValuationContext,
        series: &DateSeries,
    ) -> Result<DateSeries, TraitError>;
}
