//! Domain types.
//!
//! - [`Date`]: calendar date for valuation and sensitivity metadata
//! - [`Currency`]: ISO currency codes
//! - [`CurrencyAmount`]: an amount in a single currency
//! - [`MultiCurrencyAmount`]: amounts keyed by currency

mod amount;
mod currency;
mod date;

pub use amount::{CurrencyAmount, MultiCurrencyAmount};
pub use currency::Currency;
pub use date::Date;
