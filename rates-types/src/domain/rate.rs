//! Currency rate domain model.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::{Currency, CurrencyId};
use crate::ports::RateProvider;

/// Unique identifier for a CurrencyRate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateId(Uuid);

impl RateId {
    /// Creates a new random RateId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RateId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RateId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncates the time-of-day to midnight.
pub fn normalize_date(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

/// Name of the source a rate was obtained from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl RateProvider for ProviderName {
    fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Natural key of a rate: at most one record exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub currency_id: CurrencyId,
    pub provider_name: String,
    pub date: NaiveDateTime,
}

/// Exchange rate of a currency on a given day, as reported by one provider.
///
/// `rate` is the price of `nominal` units of the currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub id: RateId,
    pub currency: Currency,
    pub provider_name: String,
    /// Always at 00:00:00.
    pub date: NaiveDateTime,
    pub rate: f64,
    pub nominal: f64,
}

impl CurrencyRate {
    /// Creates a new, not yet persisted rate. The date is truncated to midnight.
    pub fn new(
        currency: Currency,
        provider_name: impl Into<String>,
        date: NaiveDateTime,
        rate: f64,
        nominal: f64,
    ) -> Self {
        Self {
            id: RateId::new(),
            currency,
            provider_name: provider_name.into(),
            date: normalize_date(date),
            rate,
            nominal,
        }
    }

    /// Reconstructs a rate from stored parts.
    pub fn from_parts(
        id: RateId,
        currency: Currency,
        provider_name: String,
        date: NaiveDateTime,
        rate: f64,
        nominal: f64,
    ) -> Self {
        Self {
            id,
            currency,
            provider_name,
            date,
            rate,
            nominal,
        }
    }

    /// Returns the (currency, provider, date) natural key.
    pub fn key(&self) -> RateKey {
        RateKey {
            currency_id: self.currency.id,
            provider_name: self.provider_name.clone(),
            date: self.date,
        }
    }

    /// Overwrites the rate values with those of a newer candidate for the same key.
    /// Identity, currency, provider and date are left untouched.
    pub fn update_from(&mut self, candidate: &CurrencyRate) {
        self.rate = candidate.rate;
        self.nominal = candidate.nominal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_normalize_date_truncates_to_midnight() {
        assert_eq!(normalize_date(at(2023, 5, 1, 14, 37)), at(2023, 5, 1, 0, 0));
        assert_eq!(normalize_date(at(2023, 5, 1, 0, 0)), at(2023, 5, 1, 0, 0));
    }

    #[test]
    fn test_new_rate_normalizes_date_only() {
        let rate = CurrencyRate::new(Currency::new("USD"), "ecb", at(2023, 5, 1, 14, 37), 1.05, 10.0);

        assert_eq!(rate.date, at(2023, 5, 1, 0, 0));
        assert_eq!(rate.provider_name, "ecb");
        assert_eq!(rate.rate, 1.05);
        assert_eq!(rate.nominal, 10.0);
    }

    #[test]
    fn test_key_ignores_rate_values() {
        let usd = Currency::new("USD");
        let a = CurrencyRate::new(usd.clone(), "ecb", at(2023, 5, 1, 9, 0), 1.0, 1.0);
        let b = CurrencyRate::new(usd, "ecb", at(2023, 5, 1, 18, 0), 2.0, 1.0);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_update_from_keeps_identity() {
        let usd = Currency::new("USD");
        let mut existing = CurrencyRate::new(usd.clone(), "ecb", at(2023, 5, 1, 0, 0), 1.0, 1.0);
        let candidate = CurrencyRate::new(usd, "ecb", at(2023, 5, 1, 0, 0), 1.05, 100.0);
        let id = existing.id;

        existing.update_from(&candidate);

        assert_eq!(existing.id, id);
        assert_eq!(existing.rate, 1.05);
        assert_eq!(existing.nominal, 100.0);
    }

    #[test]
    fn test_provider_name() {
        let provider = ProviderName::new("cbr");
        assert_eq!(provider.name(), "cbr");
    }
}
