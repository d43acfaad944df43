//! # YCNS Ext File
//!
//! File-based collaborators for attribution runs.
//!
//! This crate provides default implementations for testing and EOD replays:
//! - CSV historical node and FX series
//! - JSON curve node specifications
//! - JSON block curve sensitivities
//! - CSV implied-curve par rates, one curve per date
//! - Static snapshot FX matrix and market-convention currency pairs
//!
//! Loaders that read optional data treat a missing file as an empty source.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod curves;
mod market_data;
mod sensitivity;

pub use curves::*;
pub use market_data::*;
pub use sensitivity::*;

use std::path::{Path, PathBuf};

/// Standard file names inside an attribution data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    /// Historical node and FX series.
    pub const HISTORY: &'static str = "nodes.csv";
    /// Curve node specifications.
    pub const CURVES: &'static str = "curves.json";
    /// Block curve sensitivities.
    pub const SENSITIVITIES: &'static str = "sensitivities.json";
    /// Implied curve par rates.
    pub const IMPLIED: &'static str = "implied.csv";
    /// Snapshot FX rates.
    pub const FX: &'static str = "fx.json";

    /// A data directory rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `name` inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
