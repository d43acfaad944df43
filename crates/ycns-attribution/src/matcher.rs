//! Selection of a curve's sensitivity vector from a multi-currency bundle.

use tracing::warn;

use ycns_core::Currency;
use ycns_traits::sensitivity::{CurrencySensitivityBundle, SensitivityVector};
use ycns_traits::CurveName;

use crate::error::{AttributionError, AttributionResult};

/// The vector chosen for a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketMatch {
    /// Currency the chosen vector is expressed in.
    pub currency: Currency,
    /// Node sensitivities.
    pub sensitivity: SensitivityVector,
    /// Currencies that were also registered for the curve but not chosen.
    pub ignored_currencies: Vec<Currency>,
}

impl BucketMatch {
    /// Whether the choice was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        !self.ignored_currencies.is_empty()
    }
}

/// Matches a curve name to its sensitivity vector.
///
/// A curve shared across currency-specific configurations can carry
/// vectors in several currencies. The first one in bundle order wins and
/// a single warning names the curve and the chosen currency. This is a
/// deterministic tie-break, not a judgement about which currency is right.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityBucketMatcher;

impl SensitivityBucketMatcher {
    /// Creates a matcher.
    pub fn new() -> Self {
        Self
    }

    /// Finds the vector for `curve`.
    ///
    /// # Errors
    ///
    /// `MissingSensitivityData` if the bundle has no entry for `curve`.
    pub fn match_curve(
        &self,
        bundle: &CurrencySensitivityBundle,
        curve: &CurveName,
    ) -> AttributionResult<BucketMatch> {
        let mut entries = bundle.by_curve(curve);
        let (currency, sensitivity) =
            entries
                .next()
                .ok_or_else(|| AttributionError::MissingSensitivityData {
                    curve: curve.to_string(),
                })?;
        let ignored_currencies: Vec<Currency> = entries.map(|(ccy, _)| ccy).collect();

        if !ignored_currencies.is_empty() {
            warn!(
                curve = %curve,
                currency = %currency,
                ignored = ignored_currencies.len(),
                "curve has sensitivities in several currencies; using the first"
            );
        }

        Ok(BucketMatch {
            currency,
            sensitivity: sensitivity.clone(),
            ignored_currencies,
        })
    }
}
