//! Integration tests for the stores against an in-memory SQLite database.

use chrono::{NaiveDate, NaiveDateTime};
use rates_hex::{CurrencyStore, RateStore, seed_currencies};
use rates_repo::{RepoOptions, SqliteRepo};
use rates_types::{ProviderName, RateProvider, RateQuery, StoreError};

async fn create_stores() -> (CurrencyStore<SqliteRepo>, RateStore<SqliteRepo>) {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let currencies = CurrencyStore::connect(repo.clone()).await.unwrap();
    let rates = RateStore::connect(repo).await.unwrap();
    (currencies, rates)
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 5, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[tokio::test]
async fn test_unmigrated_database_fails_fast() {
    let repo = SqliteRepo::connect("sqlite::memory:", RepoOptions { auto_migrate: false })
        .await
        .unwrap();

    let result = CurrencyStore::connect(repo.clone()).await;
    assert!(matches!(result, Err(StoreError::Configuration(_))));

    let result = RateStore::connect(repo).await;
    assert!(matches!(result, Err(StoreError::Configuration(_))));
}

#[tokio::test]
async fn test_seed_twice() {
    let (currencies, _) = create_stores().await;

    assert_eq!(seed_currencies(&currencies, ["USD", "EUR"]).await.unwrap(), 2);
    assert_eq!(seed_currencies(&currencies, ["USD", "EUR"]).await.unwrap(), 0);

    let usd = currencies.get_currency("USD").await.unwrap().unwrap();
    assert_eq!(usd.code, "USD");
}

#[tokio::test]
async fn test_adding_existing_code_is_backend_fault() {
    let (currencies, _) = create_stores().await;
    currencies.add_currency("USD").await.unwrap();

    let result = currencies.add_currency("USD").await;

    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[tokio::test]
async fn test_upsert_then_latest_rate() {
    let (currencies, rates) = create_stores().await;
    let usd = currencies.add_currency("USD").await.unwrap();
    let ecb = ProviderName::new("ecb");

    rates
        .save_rates(vec![
            rates.new_rate(&usd, &ecb, at(8, 0, 0), 1.08, 1.0),
            rates.new_rate(&usd, &ecb, at(9, 0, 0), 1.09, 1.0),
            rates.new_rate(&usd, &ecb, at(10, 0, 0), 1.0, 1.0),
        ])
        .await
        .unwrap();
    rates
        .save_rates(vec![rates.new_rate(&usd, &ecb, at(10, 12, 0), 1.05, 1.0)])
        .await
        .unwrap();

    let latest = rates
        .get_rate(&usd, Some(&ecb as &dyn RateProvider), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.date, at(10, 0, 0));
    assert_eq!(latest.rate, 1.05);

    let day_ten = rates
        .rate_history(&RateQuery::for_currency("USD").on_date(at(10, 0, 0)))
        .await
        .unwrap();
    assert_eq!(day_ten.len(), 1);
}

#[tokio::test]
async fn test_afternoon_rate_matched_at_midnight() {
    let (currencies, rates) = create_stores().await;
    let usd = currencies.add_currency("USD").await.unwrap();
    let ecb = ProviderName::new("ecb");

    rates
        .save_rates(vec![rates.new_rate(&usd, &ecb, at(1, 14, 37), 1.05, 1.0)])
        .await
        .unwrap();

    let found = rates
        .get_rate(&usd, Some(&ecb as &dyn RateProvider), Some(at(1, 0, 0)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.date, at(1, 0, 0));

    let missing = rates
        .get_rate(&usd, Some(&ecb as &dyn RateProvider), Some(at(2, 0, 0)))
        .await
        .unwrap();
    assert!(missing.is_none());
}
