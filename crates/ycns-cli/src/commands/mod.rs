//! CLI command implementations.

pub mod attribute;
pub mod check;

pub use attribute::AttributeArgs;
pub use check::CheckArgs;

use std::path::Path;

use ycns_config::AttributionConfig;

use crate::error::CliResult;

/// Loads and validates an attribution configuration.
pub fn load_config(path: &Path) -> CliResult<AttributionConfig> {
    Ok(AttributionConfig::from_path(path)?)
}
