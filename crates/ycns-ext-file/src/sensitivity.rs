//! File-based block curve sensitivities.

use std::path::Path;

use tracing::debug;

use ycns_traits::error::TraitError;
use ycns_traits::sensitivity::{CurrencySensitivityBundle, Position, SensitivitySource};
use ycns_traits::ValuationContext;

/// Sensitivities loaded from JSON `[{"curve", "currency", "values"}]`.
///
/// Entry order in the file is the bundle order. The same bundle is
/// returned for every position, so one file describes one position.
#[derive(Debug, Clone, Default)]
pub struct JsonSensitivitySource {
    bundle: CurrencySensitivityBundle,
}

impl JsonSensitivitySource {
    /// Load sensitivities from a JSON file.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path)?;
        let bundle: CurrencySensitivityBundle =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;
        debug!(path = %file_path.display(), entries = bundle.len(), "sensitivities loaded");
        Ok(Self { bundle })
    }

    /// Wrap an in-memory bundle.
    pub fn from_bundle(bundle: CurrencySensitivityBundle) -> Self {
        Self { bundle }
    }

    /// The loaded bundle.
    pub fn bundle(&self) -> &CurrencySensitivityBundle {
        &self.bundle
    }
}

impl SensitivitySource for JsonSensitivitySource {
    fn block_curve_sensitivities(
        &self,
        _ctx: &ValuationContext,
        _position: &Position,
    ) -> Result<CurrencySensitivityBundle, TraitError> {
        Ok(self.bundle.clone())
    }
}
