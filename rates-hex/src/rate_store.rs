//! Rate Store
//!
//! Builds, upserts and queries currency rates through the repository port.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDateTime;
use tracing::instrument;

use rates_types::{
    Currency, CurrencyRate, RateKey, RateProvider, RateQuery, RateRepository, StoreError,
};

/// Application service for currency rates.
///
/// Generic over `R: RateRepository` - the adapter is injected at compile time.
pub struct RateStore<R: RateRepository> {
    repo: R,
}

impl<R: RateRepository> RateStore<R> {
    /// Creates the store, failing fast when the backing store has no
    /// rate table.
    pub async fn connect(repo: R) -> Result<Self, StoreError> {
        if !repo.has_rate_schema().await? {
            return Err(StoreError::Configuration(
                "no table mapped for currency rate records".into(),
            ));
        }

        Ok(Self { repo })
    }

    /// Builds an in-memory rate. The date is truncated to midnight; nothing
    /// is persisted until `save_rates`.
    pub fn new_rate(
        &self,
        currency: &Currency,
        provider: &dyn RateProvider,
        date: NaiveDateTime,
        rate: f64,
        nominal: f64,
    ) -> CurrencyRate {
        CurrencyRate::new(currency.clone(), provider.name(), date, rate, nominal)
    }

    /// Upserts a batch of rates by natural key in one transaction.
    ///
    /// Returns the records as persisted; an upserted record keeps the id it
    /// already had in the store.
    #[instrument(skip(self, rates), fields(batch = rates.len()))]
    pub async fn save_rates(
        &self,
        rates: Vec<CurrencyRate>,
    ) -> Result<Vec<CurrencyRate>, StoreError> {
        let received = rates.len();
        let batch = collapse_duplicates(rates);
        if batch.len() < received {
            tracing::debug!(
                "Collapsed {} duplicate keys in batch",
                received - batch.len()
            );
        }

        let saved = self.repo.save_rates(batch).await?;

        tracing::info!("Saved {} rates", saved.len());
        Ok(saved)
    }

    /// Returns the most recent rate for the currency, optionally restricted
    /// to one provider and/or one day.
    pub async fn get_rate(
        &self,
        currency: &Currency,
        provider: Option<&dyn RateProvider>,
        date: Option<NaiveDateTime>,
    ) -> Result<Option<CurrencyRate>, StoreError> {
        let mut query = RateQuery::for_currency(currency.code());
        if let Some(provider) = provider {
            query = query.with_provider(provider.name());
        }
        if let Some(date) = date {
            query = query.on_date(date);
        }

        tracing::debug!(?query, "Looking up rate");

        let rates = self.repo.find_rates(&query, Some(1)).await?;
        Ok(rates.into_iter().next())
    }

    /// Returns every matching rate, newest first.
    pub async fn rate_history(&self, query: &RateQuery) -> Result<Vec<CurrencyRate>, StoreError> {
        Ok(self.repo.find_rates(query, None).await?)
    }
}

/// Merges candidates sharing a natural key: the first position is kept and
/// the last candidate's values win.
fn collapse_duplicates(rates: Vec<CurrencyRate>) -> Vec<CurrencyRate> {
    let mut positions: HashMap<RateKey, usize> = HashMap::with_capacity(rates.len());
    let mut batch: Vec<CurrencyRate> = Vec::with_capacity(rates.len());

    for rate in rates {
        match positions.entry(rate.key()) {
            Entry::Occupied(entry) => batch[*entry.get()].update_from(&rate),
            Entry::Vacant(entry) => {
                entry.insert(batch.len());
                batch.push(rate);
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_collapse_keeps_distinct_keys() {
        let usd = Currency::new("USD");
        let rates = vec![
            CurrencyRate::new(usd.clone(), "ecb", day(1), 1.0, 1.0),
            CurrencyRate::new(usd.clone(), "ecb", day(2), 1.1, 1.0),
            CurrencyRate::new(usd, "cbr", day(1), 1.2, 1.0),
        ];

        assert_eq!(collapse_duplicates(rates).len(), 3);
    }

    #[test]
    fn test_collapse_last_value_wins() {
        let usd = Currency::new("USD");
        let first = CurrencyRate::new(usd.clone(), "ecb", day(1), 1.0, 1.0);
        let first_id = first.id;
        let rates = vec![
            first,
            CurrencyRate::new(usd.clone(), "ecb", day(2), 2.0, 1.0),
            CurrencyRate::new(usd, "ecb", day(1), 1.5, 10.0),
        ];

        let batch = collapse_duplicates(rates);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, first_id);
        assert_eq!(batch[0].rate, 1.5);
        assert_eq!(batch[0].nominal, 10.0);
        assert_eq!(batch[1].date, day(2));
    }
}
