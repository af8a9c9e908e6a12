//! Rate lookup filter.

use chrono::NaiveDateTime;

use super::rate::{CurrencyRate, normalize_date};

/// Filter for rate lookups.
///
/// The currency is mandatory; provider and date narrow the result when set.
/// Matching rates are ordered by date descending, then provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub currency_code: String,
    pub provider_name: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl RateQuery {
    pub fn for_currency(code: impl Into<String>) -> Self {
        Self {
            currency_code: code.into(),
            provider_name: None,
            date: None,
        }
    }

    pub fn with_provider(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    /// Restricts to one day. The time-of-day is ignored.
    pub fn on_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(normalize_date(date));
        self
    }

    /// In-memory equivalent of the adapters' SQL predicate.
    pub fn matches(&self, rate: &CurrencyRate) -> bool {
        rate.currency.code == self.currency_code
            && self
                .provider_name
                .as_deref()
                .is_none_or(|p| rate.provider_name == p)
            && self.date.is_none_or(|d| rate.date == d)
    }

    /// Orders rates the way lookups return them: newest first.
    pub fn sort(rates: &mut [CurrencyRate]) {
        rates.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.provider_name.cmp(&b.provider_name))
        });
    }
}
