//! Domain models for the currency rates store.

pub mod currency;
pub mod query;
pub mod rate;

pub use currency::{Currency, CurrencyId};
pub use query::RateQuery;
pub use rate::{CurrencyRate, ProviderName, RateId, RateKey, normalize_date};
