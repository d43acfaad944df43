//! YCNS Configuration Layer
//!
//! Configuration for attribution runs, loaded from JSON or TOML and
//! validated before use.
//!
//! # Example
//!
//! ```rust
//! use ycns_config::AttributionConfig;
//!
//! let config = AttributionConfig::from_json_str(r#"{
//!     "position": {"id": "FXF-1", "pay_currency": "USD", "receive_currency": "EUR"},
//!     "curve": {"name": "USD-OIS", "currency": "USD"},
//!     "output_currency": "EUR",
//!     "window": {"start": "2025-01-06", "end": "2025-01-31"}
//! }"#).unwrap();
//!
//! assert!(!config.is_implied_curve());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribution;
pub mod error;

pub use attribution::{AttributionConfig, CurveSection, PositionConfig, ReturnKind, WindowConfig};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
