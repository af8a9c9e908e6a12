//! Command handlers.
//!
//! Each handler takes the stores it needs and returns the records to print;
//! `main` owns parsing and output.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;

use rates_hex::{BASE_CURRENCIES, CurrencyStore, RateStore, seed_currencies};
use rates_types::{
    Currency, CurrencyRate, CurrencyRepository, ProviderName, RateInput, RateProvider, RateQuery,
    RateRepository,
};

/// Looks up a currency that a rate command refers to. Unknown codes are errors.
pub async fn require_currency<C: CurrencyRepository>(
    store: &CurrencyStore<C>,
    code: &str,
) -> Result<Currency> {
    store.get_currency(code).await?.ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown currency: {}. Run `rates seed` or `rates currency add {}` first",
            code,
            code
        )
    })
}

/// Creates the given codes, or the built-in base list when `codes` is empty.
pub async fn seed<C: CurrencyRepository>(
    currencies: &CurrencyStore<C>,
    codes: &[String],
) -> Result<usize> {
    let created = if codes.is_empty() {
        seed_currencies(currencies, BASE_CURRENCIES).await?
    } else {
        seed_currencies(currencies, codes).await?
    };
    Ok(created)
}

pub async fn add_rate<C: CurrencyRepository, R: RateRepository>(
    currencies: &CurrencyStore<C>,
    rates: &RateStore<R>,
    code: &str,
    provider: String,
    date: NaiveDateTime,
    rate: f64,
    nominal: f64,
) -> Result<Vec<CurrencyRate>> {
    let currency = require_currency(currencies, code).await?;
    let provider = ProviderName::new(provider);
    let candidate = rates.new_rate(&currency, &provider, date, rate, nominal);
    Ok(rates.save_rates(vec![candidate]).await?)
}

/// Reads a JSON array of rates.
pub async fn read_rate_file(path: &Path) -> Result<Vec<RateInput>> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid rates file {:?}: {}", path, e))
}

/// Saves imported rates as one batch. Every referenced currency must exist;
/// nothing is written otherwise.
pub async fn import_rates<C: CurrencyRepository, R: RateRepository>(
    currencies: &CurrencyStore<C>,
    rates: &RateStore<R>,
    inputs: Vec<RateInput>,
) -> Result<Vec<CurrencyRate>> {
    let mut resolved: HashMap<String, Currency> = HashMap::new();
    let mut batch = Vec::with_capacity(inputs.len());

    for input in inputs {
        if !resolved.contains_key(&input.currency) {
            let currency = require_currency(currencies, &input.currency).await?;
            resolved.insert(input.currency.clone(), currency);
        }
        let currency = &resolved[&input.currency];
        let provider = ProviderName::new(input.provider);
        batch.push(rates.new_rate(currency, &provider, input.date, input.rate, input.nominal));
    }

    Ok(rates.save_rates(batch).await?)
}

pub async fn latest_rate<C: CurrencyRepository, R: RateRepository>(
    currencies: &CurrencyStore<C>,
    rates: &RateStore<R>,
    code: &str,
    provider: Option<String>,
    date: Option<NaiveDateTime>,
) -> Result<Option<CurrencyRate>> {
    let currency = require_currency(currencies, code).await?;
    let provider = provider.map(ProviderName::new);

    Ok(rates
        .get_rate(
            &currency,
            provider.as_ref().map(|p| p as &dyn RateProvider),
            date,
        )
        .await?)
}

pub async fn rate_history<C: CurrencyRepository, R: RateRepository>(
    currencies: &CurrencyStore<C>,
    rates: &RateStore<R>,
    code: &str,
    provider: Option<String>,
) -> Result<Vec<CurrencyRate>> {
    let currency = require_currency(currencies, code).await?;

    let mut query = RateQuery::for_currency(currency.code);
    if let Some(provider) = provider {
        query = query.with_provider(provider);
    }
    Ok(rates.rate_history(&query).await?)
}
