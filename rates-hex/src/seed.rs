//! Base currency seeding.

use rates_types::{CurrencyRepository, StoreError};

use crate::CurrencyStore;

/// Currencies every installation starts with.
pub const BASE_CURRENCIES: [&str; 43] = [
    "AUD", "AZN", "GBP", "AMD", "BYR", "BGN", "BRL", "HUF", "DKK", "USD", "EUR", "INR", "KZT",
    "CAD", "KGS", "CNY", "MDL", "NOK", "PLN", "RON", "XDR", "SGD", "TJS", "TRY", "TMT", "UZS",
    "UAH", "CZK", "SEK", "CHF", "ZAR", "KRW", "JPY", "RUB", "HRK", "HKD", "IDR", "ILS", "MXN",
    "MYR", "NZD", "PHP", "THB",
];

/// Creates every code not yet present and returns how many were created.
///
/// Running it again over the same codes creates nothing. A persistence
/// failure stops the loop; codes created before it stay created.
pub async fn seed_currencies<R, I, S>(
    store: &CurrencyStore<R>,
    codes: I,
) -> Result<usize, StoreError>
where
    R: CurrencyRepository,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut created = 0;

    for code in codes {
        let code = code.as_ref();
        if store.get_currency(code).await?.is_none() {
            store.add_currency(code).await?;
            created += 1;
        }
    }

    tracing::info!("{} currencies created", created);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_base_currencies_are_unique() {
        let unique: HashSet<&str> = BASE_CURRENCIES.iter().copied().collect();
        assert_eq!(unique.len(), BASE_CURRENCIES.len());
    }

    #[test]
    fn test_base_currencies_are_three_letter_codes() {
        assert!(
            BASE_CURRENCIES
                .iter()
                .all(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_uppercase()))
        );
    }
}
