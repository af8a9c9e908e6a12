//! # Rates Hex
//!
//! Application service layer for the currency rates store.
//!
//! ## Architecture
//!
//! - `currency_store` - create and look up currencies
//! - `rate_store` - build, upsert and query currency rates
//! - `seed` - create the base currency set
//!
//! The stores are generic over the repository ports, allowing
//! different repository implementations to be injected.

pub mod currency_store;
pub mod rate_store;
pub mod seed;


pub use currency_store::CurrencyStore;
pub use rate_store::RateStore;
pub use seed::{BASE_CURRENCIES, seed_currencies};
