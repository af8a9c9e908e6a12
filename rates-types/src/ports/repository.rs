//! Repository port traits.
//!
//! These are the primary ports in our hexagonal architecture.
//! Adapters (SQLite, Postgres, in-memory test doubles) implement them.

use crate::domain::{Currency, CurrencyRate, RateQuery};
use crate::error::RepoError;

/// Storage port for currency records.
#[async_trait::async_trait]
pub trait CurrencyRepository: Send + Sync + 'static {
    /// Reports whether the backing store has a table for currency records.
    async fn has_currency_schema(&self) -> Result<bool, RepoError>;

    /// Finds a currency by exact code.
    async fn find_currency_by_code(&self, code: &str) -> Result<Option<Currency>, RepoError>;

    /// Lists all currencies ordered by code.
    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError>;

    /// Durably writes a new currency.
    async fn insert_currency(&self, currency: &Currency) -> Result<(), RepoError>;
}

/// Storage port for currency rate records.
#[async_trait::async_trait]
pub trait RateRepository: Send + Sync + 'static {
    /// Reports whether the backing store has a table for rate records.
    async fn has_rate_schema(&self) -> Result<bool, RepoError>;

    /// Upserts a batch of rates by natural key (currency, provider, date).
    ///
    /// For each candidate an existing record with the same key is looked up;
    /// if found its rate and nominal are overwritten and it is written back
    /// in place of the candidate, otherwise the candidate is inserted.
    /// The whole batch MUST commit atomically: on error nothing is written.
    ///
    /// Returns the records as persisted, in batch order.
    async fn save_rates(&self, rates: Vec<CurrencyRate>) -> Result<Vec<CurrencyRate>, RepoError>;

    /// Finds matching rates ordered by date descending, then provider name.
    /// `limit` caps the number of rows; `None` returns all of them.
    async fn find_rates(
        &self,
        query: &RateQuery,
        limit: Option<u32>,
    ) -> Result<Vec<CurrencyRate>, RepoError>;
}
