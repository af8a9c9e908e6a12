//! Currency Store
//!
//! Create and look up currency records through the repository port.

use rates_types::{Currency, CurrencyRepository, StoreError};

/// Application service for currency records.
///
/// Generic over `R: CurrencyRepository` - the adapter is injected at compile time.
pub struct CurrencyStore<R: CurrencyRepository> {
    repo: R,
}

impl<R: CurrencyRepository> CurrencyStore<R> {
    /// Creates the store, failing fast when the backing store has no
    /// currency table.
    pub async fn connect(repo: R) -> Result<Self, StoreError> {
        if !repo.has_currency_schema().await? {
            return Err(StoreError::Configuration(
                "no table mapped for currency records".into(),
            ));
        }

        Ok(Self { repo })
    }

    /// Finds a currency by exact code. Absence is `Ok(None)`.
    pub async fn get_currency(&self, code: &str) -> Result<Option<Currency>, StoreError> {
        tracing::debug!("Looking up currency {}", code);
        Ok(self.repo.find_currency_by_code(code).await?)
    }

    /// Creates and persists a new currency.
    ///
    /// Does not check for an existing record with the same code; callers
    /// that need create-if-absent use `get_currency` first.
    pub async fn add_currency(&self, code: &str) -> Result<Currency, StoreError> {
        let currency = Currency::new(code);
        self.repo.insert_currency(&currency).await?;

        tracing::info!("Created currency {}", currency.code);
        Ok(currency)
    }

    /// Lists all currencies ordered by code.
    pub async fn list_currencies(&self) -> Result<Vec<Currency>, StoreError> {
        Ok(self.repo.list_currencies().await?)
    }
}
