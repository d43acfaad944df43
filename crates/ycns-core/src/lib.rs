//! # YCNS Core
//!
//! Value types shared by every crate in the YCNS workspace.
//!
//! - **Types**: `Date`, `DateWindow`, `Currency`, `CurrencyPair`, `Tenor`
//! - **Series**: `DateSeries`, a strictly date-ordered series of `f64` samples,
//!   and `LabeledSeriesMatrix`, the tenor-keyed output of an attribution run
//!
//! ## Example
//!
//! ```rust
//! use ycns_core::prelude::*;
//!
//! let d1 = Date::from_ymd(2025, 1, 6).unwrap();
//! let d2 = Date::from_ymd(2025, 1, 7).unwrap();
//! let series = DateSeries::new(vec![d1, d2], vec![1.0, 2.0]).unwrap();
//! assert_eq!(series.scale(10.0).values(), &[10.0, 20.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod series;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::series::{DateSeries, LabeledSeriesMatrix};
    pub use crate::types::{
        Currency, CurrencyPair, Date, DateWindow, Tenor, UnorderedCurrencyPair,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use series::{DateSeries, LabeledSeriesMatrix};
pub use types::{Currency, CurrencyPair, Date, DateWindow, Tenor, UnorderedCurrencyPair};
