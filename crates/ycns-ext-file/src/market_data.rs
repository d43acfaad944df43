//! File-based market data sources.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use ycns_core::{Currency, CurrencyPair, Date, DateSeries, DateWindow, UnorderedCurrencyPair};
use ycns_traits::curves::CurveNode;
use ycns_traits::error::TraitError;
use ycns_traits::market_data::{CurrencyPairSource, FxMatrixSource, HistoricalMarketData};
use ycns_traits::ValuationContext;

// =============================================================================
// CSV HISTORICAL SOURCE
// =============================================================================

/// CSV record for one historical sample.
#[derive(Debug, Deserialize)]
struct SampleRecord {
    series_id: String,
    date: Date,
    value: f64,
}

/// CSV-based history of curve node quotes and FX rates.
///
/// Rows are `series_id,date,value`. Node series are looked up by node
/// key, FX series by the six-letter pair code (`EURUSD` holds USD per EUR).
/// Rows may appear in any order; a series sampled twice on one date is
/// rejected.
pub struct CsvHistoricalSource {
    file_path: PathBuf,
    series: DashMap<String, DateSeries>,
}

impl CsvHistoricalSource {
    /// Create a new CSV historical source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            series: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload series from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            return Ok(()); // Empty source
        }

        let mut reader = csv::Reader::from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut samples: BTreeMap<String, BTreeMap<Date, f64>> = BTreeMap::new();
        for result in reader.deserialize() {
            let record: SampleRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let by_date = samples.entry(record.series_id.clone()).or_default();
            if by_date.insert(record.date, record.value).is_some() {
                return Err(TraitError::ParseError(format!(
                    "{} sampled twice on {}",
                    record.series_id, record.date
                )));
            }
        }

        self.series.clear();
        for (id, by_date) in samples {
            self.series.insert(id, DateSeries::from_pairs(by_date)?);
        }
        debug!(path = %self.file_path.display(), series = self.series.len(), "historical series loaded");
        Ok(())
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no series was loaded.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn window_of(&self, id: &str, window: &DateWindow) -> Result<DateSeries, TraitError> {
        self.series
            .get(id)
            .map(|s| s.between(window.start(), window.end()))
            .ok_or_else(|| TraitError::NotFound(format!("no history for {id}")))
    }
}

impl HistoricalMarketData for CsvHistoricalSource {
    fn curve_node_series(
        &self,
        _ctx: &ValuationContext,
        node: &CurveNode,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError> {
        self.window_of(node.key.as_str(), window)
    }

    fn fx_series(
        &self,
        _ctx: &ValuationContext,
        pair: &CurrencyPair,
        window: &DateWindow,
    ) -> Result<DateSeries, TraitError> {
        self.window_of(&pair.code(), window)
    }
}

// =============================================================================
// STATIC FX MATRIX
// =============================================================================

/// JSON record for one snapshot rate.
#[derive(Debug, Deserialize)]
struct RateRecord {
    from: Currency,
    to: Currency,
    rate: f64,
}

/// Snapshot FX rates loaded from JSON `[{"from", "to", "rate"}]`.
///
/// A rate for `from -> to` also answers `to -> from` by inversion.
#[derive(Default)]
pub struct StaticFxMatrix {
    rates: DashMap<(Currency, Currency), f64>,
}

impl StaticFxMatrix {
    /// An empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rates from a JSON file. A missing file gives an empty matrix.
    pub fn from_path(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let file_path = file_path.as_ref();
        let matrix = Self::new();
        if !file_path.exists() {
            return Ok(matrix);
        }

        let content = std::fs::read_to_string(file_path)?;
        let records: Vec<RateRecord> =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;
        for record in records {
            if !(record.rate.is_finite() && record.rate > 0.0) {
                return Err(TraitError::ParseError(format!(
                    "rate {}{} must be positive, got {}",
                    record.from, record.to, record.rate
                )));
            }
            matrix.rates.insert((record.from, record.to), record.rate);
        }
        Ok(matrix)
    }

    /// Builder-style insert of `to` units per `from`.
    #[must_use]
    pub fn with_rate(self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }
}

impl FxMatrixSource for StaticFxMatrix {
    fn fx_rate(
        &self,
        _ctx: &ValuationContext,
        from: Currency,
        to: Currency,
    ) -> Result<f64, TraitError> {
        if from == to {
            return Ok(1.0);
        }
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Ok(*rate);
        }
        if let Some(rate) = self.rates.get(&(to, from)) {
            return Ok(1.0 / *rate);
        }
        Err(TraitError::MissingData(format!("no FX rate {from}/{to}")))
    }
}

// =============================================================================
// MARKET CONVENTION PAIRS
// =============================================================================

/// Orders currency pairs by the usual market quoting priority.
///
/// The currency earlier in [`PRIORITY`](Self::PRIORITY) is the base.
/// Currencies outside the list rank after it, by code.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketConventionPairs;

impl MarketConventionPairs {
    /// Base-currency priority, highest first.
    pub const PRIORITY: [Currency; 8] = [
        Currency::EUR,
        Currency::GBP,
        Currency::AUD,
        Currency::NZD,
        Currency::USD,
        Currency::CAD,
        Currency::CHF,
        Currency::JPY,
    ];

    fn rank(currency: Currency) -> (usize, &'static str) {
        let idx = Self::PRIORITY
            .iter()
            .position(|c| *c == currency)
            .unwrap_or(Self::PRIORITY.len());
        (idx, currency.code())
    }
}

impl CurrencyPairSource for MarketConventionPairs {
    fn currency_pair(&self, pair: &UnorderedCurrencyPair) -> Result<CurrencyPair, TraitError> {
        let (a, b) = pair.currencies();
        if a == b {
            return Err(TraitError::InvalidInput(format!("degenerate pair {pair}")));
        }
        if Self::rank(a) <= Self::rank(b) {
            Ok(CurrencyPair::new(a, b))
        } else {
            Ok(CurrencyPair::new(b, a))
        }
    }
}
