//! Domain value types.
//!
//! - [`Date`]: Calendar date with weekday helpers
//! - [`DateWindow`]: Inclusive date range with the one-week fetch extension
//! - [`Currency`]: ISO currency codes
//! - [`CurrencyPair`] / [`UnorderedCurrencyPair`]: FX pairs
//! - [`Tenor`]: Curve node maturity label, the risk bucket key

mod currency;
mod date;
mod tenor;
mod window;

pub use currency::{Currency, CurrencyPair, UnorderedCurrencyPair};
pub use date::Date;
pub use tenor::Tenor;
pub use window::DateWindow;
