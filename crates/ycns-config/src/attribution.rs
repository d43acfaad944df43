//! Attribution request configuration.
//!
//! One [`AttributionConfig`] describes a single attribution run: which
//! position, which curve, which window and how to convert currencies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use ycns_core::{Currency, Date, DateWindow};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// RETURN KIND
// =============================================================================

/// How observable levels are turned into daily moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    /// `v[t] - v[t-1]`; the usual choice for rate quotes.
    #[default]
    Absolute,
    /// `v[t] / v[t-1] - 1`; for price-like observables.
    Relative,
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Position section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Position identifier.
    pub id: String,
    /// Currency paid.
    pub pay_currency: Currency,
    /// Currency received.
    pub receive_currency: Currency,
}

/// Curve section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveSection {
    /// Curve name.
    pub name: String,
    /// Native currency of the curve.
    pub currency: Currency,
    /// Construction configuration used to rebuild the curve when it is implied.
    #[serde(default)]
    pub construction_config: Option<String>,
}

/// Window section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// First PnL date.
    pub start: Date,
    /// Last PnL date.
    pub end: Date,
}

// =============================================================================
// ATTRIBUTION CONFIG
// =============================================================================

/// Configuration of one attribution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Position being attributed.
    pub position: PositionConfig,

    /// Curve being attributed.
    pub curve: CurveSection,

    /// Names of curves whose nodes are implied by curve construction
    /// rather than quoted.
    #[serde(default)]
    pub implied_curve_names: BTreeSet<String>,

    /// Requested output currency. `None` leaves PnL in the curve currency.
    #[serde(default)]
    pub output_currency: Option<Currency>,

    /// Convert with the same-date historical spot rate instead of one
    /// snapshot rate.
    #[serde(default)]
    pub use_historical_spot: bool,

    /// Return computation applied to observables.
    #[serde(default)]
    pub return_kind: ReturnKind,

    /// PnL window.
    pub window: WindowConfig,

    /// Valuation date for sensitivities and snapshot FX. Defaults to the
    /// window end.
    #[serde(default)]
    pub valuation_date: Option<Date>,
}

impl AttributionConfig {
    /// Loads a configuration, picking JSON or TOML from the file extension,
    /// and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Whether the configured curve is in the implied set.
    pub fn is_implied_curve(&self) -> bool {
        self.implied_curve_names.contains(&self.curve.name)
    }

    /// The validated PnL window.
    pub fn date_window(&self) -> ConfigResult<DateWindow> {
        DateWindow::new(self.window.start, self.window.end).map_err(|e| {
            ConfigError::Validation {
                field: "window".to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Valuation date, defaulting to the window end.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date.unwrap_or(self.window.end)
    }
}

impl Validate for AttributionConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.position.id.trim().is_empty() {
            errors.push(ValidationError::new("position.id", "Position id cannot be empty"));
        }

        if self.curve.name.trim().is_empty() {
            errors.push(ValidationError::new("curve.name", "Curve name cannot be empty"));
        }

        if self.window.start > self.window.end {
            errors.push(ValidationError::new(
                "window",
                format!(
                    "Start {} is after end {}",
                    self.window.start, self.window.end
                ),
            ));
        }

        if self.is_implied_curve() && self.curve.construction_config.is_none() {
            errors.push(ValidationError::new(
                "curve.construction_config",
                "Implied curves need a construction configuration",
            ));
        }

        if self.use_historical_spot && self.output_currency.is_none() {
            errors.push(ValidationError::new(
                "use_historical_spot",
                "Historical spot conversion requires an output currency",
            ));
        }

        errors
    }
}
