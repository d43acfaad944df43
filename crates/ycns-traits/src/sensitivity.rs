//! Block curve sensitivities.

use serde::{Deserialize, Serialize};

use crate::context::ValuationContext;
use crate::error::TraitError;
use crate::ids::{CurveName, PositionId};
use ycns_core::{Currency, UnorderedCurrencyPair};

/// A position whose curve PnL is being attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Position identifier.
    pub id: PositionId,
    /// Currency paid.
    pub pay_currency: Currency,
    /// Currency received.
    pub receive_currency: Currency,
}

impl Position {
    /// Create a position reference.
    pub fn new(id: impl Into<PositionId>, pay_currency: Currency, receive_currency: Currency) -> Self {
        Self {
            id: id.into(),
            pay_currency,
            receive_currency,
        }
    }

    /// The position's currencies as an unordered pair.
    pub fn currency_pair(&self) -> UnorderedCurrencyPair {
        UnorderedCurrencyPair::of(self.pay_currency, self.receive_currency)
    }
}

/// Sensitivities of a position to each node of one curve, in the
/// curve's node order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensitivityVector(Vec<f64>);

impl SensitivityVector {
    /// Wrap node sensitivities.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sensitivity to node `idx`.
    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied()
    }

    /// All sensitivities.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for SensitivityVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// One `(curve, currency) -> vector` entry of a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    /// Curve name.
    pub curve: CurveName,
    /// Currency the sensitivities are expressed in.
    pub currency: Currency,
    /// Node sensitivities.
    #[serde(rename = "values")]
    pub sensitivity: SensitivityVector,
}

/// Block curve sensitivities of a position, keyed by curve name then
/// currency.
///
/// A curve name may carry vectors in several currencies when it is
/// shared across currency-specific curve configurations. Entries keep
/// their insertion order, which is the iteration order consumers see.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencySensitivityBundle {
    entries: Vec<SensitivityEntry>,
}

impl CurrencySensitivityBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, curve: impl Into<CurveName>, currency: Currency, values: Vec<f64>) -> Self {
        self.insert(curve, currency, values.into());
        self
    }

    /// Adds or replaces the vector for `(curve, currency)`.
    ///
    /// Replacing keeps the entry's original position.
    pub fn insert(&mut self, curve: impl Into<CurveName>, currency: Currency, sensitivity: SensitivityVector) {
        let curve = curve.into();
        match self
            .entries
            .iter_mut()
            .find(|e| e.curve == curve && e.currency == currency)
        {
            Some(existing) => existing.sensitivity = sensitivity,
            None => self.entries.push(SensitivityEntry {
                curve,
                currency,
                sensitivity,
            }),
        }
    }

    /// Vectors registered for `curve`, in insertion order.
    pub fn by_curve<'a>(
        &'a self,
        curve: &CurveName,
    ) -> impl Iterator<Item = (Currency, &'a SensitivityVector)> + 'a {
        let curve = curve.clone();
        self.entries
            .iter()
            .filter(move |e| e.curve == curve)
            .map(|e| (e.currency, &e.sensitivity))
    }

    /// All entries.
    pub fn entries(&self) -> &[SensitivityEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trait for the pricing routine that produces block curve sensitivities.
pub trait SensitivitySource: Send + Sync {
    /// Block curve sensitivities of `position` as of the valuation date.
    fn block_curve_sensitivities(
        &self,
        ctx: &ValuationContext,
        position: &Position,
    ) -> Result<CurrencySensitivityBundle, TraitError>;
}
