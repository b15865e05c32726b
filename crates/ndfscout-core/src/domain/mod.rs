//! # Domain Models
//!
//! Canonical domain types for forward-curve ticker discovery.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tenor`] | Forward maturity label, ordered by maturity |
//! | [`CurrencyPair`] | Validated six-letter pair code |
//! | [`TickerCandidate`] | Generated ticker with pair/tenor/family decomposition |
//! | [`Price`] | `PX_LAST` as reported: numeric or raw |
//! | [`ValidationResult`] | Ticker whose `PX_LAST` came back non-null |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp used in report metadata |
//!
//! Tenor ordering is always maturity order: `9M < 1Y < 18M < 2Y`.

mod models;
mod pair;
mod tenor;
mod timestamp;

pub use models::{Price, TickerCandidate, ValidationResult};
pub use pair::{validate_currency_code, CurrencyPair};
pub use tenor::{coverage_span, Tenor};
pub use timestamp::UtcDateTime;
