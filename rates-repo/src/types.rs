//! Database row types for SQLite and PostgreSQL.
//!
//! Each backend has its own row structs so both adapters can be compiled
//! into the same build.

use rates_types::RepoError;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite: UUIDs and dates stored as TEXT
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub mod sqlite {
    use chrono::{Datelike, NaiveDateTime};
    use sqlx::FromRow;

    use rates_types::{Currency, CurrencyId, CurrencyRate, RateId, RepoError};

    use super::parse_uuid;

    /// Storage format of rate dates (TEXT column).
    pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Currency row from database.
    #[derive(FromRow)]
    pub struct DbCurrency {
        pub id: String,
        pub code: String,
    }

    /// Rate row joined with its currency's code.
    #[derive(FromRow)]
    pub struct DbRate {
        pub id: String,
        pub currency_id: String,
        pub currency_code: String,
        pub provider_name: String,
        pub date: String,
        pub rate: f64,
        pub nominal: f64,
    }

    /// Formats a date for storage.
    ///
    /// Only four-digit years keep the text ordering equal to date ordering,
    /// so anything outside 0..=9999 is rejected.
    pub fn format_date(date: NaiveDateTime) -> Result<String, RepoError> {
        if !(0..=9999).contains(&date.year()) {
            return Err(RepoError::Database(format!(
                "Date {} is outside the supported range (years 0-9999)",
                date
            )));
        }
        Ok(date.format(DATE_FORMAT).to_string())
    }

    pub fn parse_date(s: &str) -> Result<NaiveDateTime, RepoError> {
        NaiveDateTime::parse_from_str(s, DATE_FORMAT)
            .map_err(|e| RepoError::Database(format!("Invalid stored date {:?}: {}", s, e)))
    }

    impl DbCurrency {
        /// Convert database row to domain Currency.
        pub fn into_domain(self) -> Result<Currency, RepoError> {
            let id = CurrencyId::from_uuid(parse_uuid(&self.id)?);
            Ok(Currency::from_parts(id, self.code))
        }
    }

    impl DbRate {
        /// Convert database row to domain CurrencyRate.
        pub fn into_domain(self) -> Result<CurrencyRate, RepoError> {
            Ok(CurrencyRate::from_parts(
                RateId::from_uuid(parse_uuid(&self.id)?),
                Currency::from_parts(
                    CurrencyId::from_uuid(parse_uuid(&self.currency_id)?),
                    self.currency_code,
                ),
                self.provider_name,
                parse_date(&self.date)?,
                self.rate,
                self.nominal,
            ))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL: native UUID and TIMESTAMP columns
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub mod postgres {
    use chrono::NaiveDateTime;
    use sqlx::FromRow;
    use uuid::Uuid;

    use rates_types::{Currency, CurrencyId, CurrencyRate, RateId, RepoError};

    /// Currency row from database.
    #[derive(FromRow)]
    pub struct DbCurrency {
        pub id: Uuid,
        pub code: String,
    }

    /// Rate row joined with its currency's code.
    #[derive(FromRow)]
    pub struct DbRate {
        pub id: Uuid,
        pub currency_id: Uuid,
        pub currency_code: String,
        pub provider_name: String,
        pub date: NaiveDateTime,
        pub rate: f64,
        pub nominal: f64,
    }

    impl DbCurrency {
        pub fn into_domain(self) -> Result<Currency, RepoError> {
            Ok(Currency::from_parts(CurrencyId::from_uuid(self.id), self.code))
        }
    }

    impl DbRate {
        pub fn into_domain(self) -> Result<CurrencyRate, RepoError> {
            Ok(CurrencyRate::from_parts(
                RateId::from_uuid(self.id),
                Currency::from_parts(CurrencyId::from_uuid(self.currency_id), self.currency_code),
                self.provider_name,
                self.date,
                self.rate,
                self.nominal,
            ))
        }
    }
}

#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
}


#[cfg(all(test, feature = "postgres"))]
mod postgres_tests {
    use super::postgres::*;
    use chrono::NaiveDate;
    use rates_types::{CurrencyId, RateId};
    use uuid::Uuid;

    #[test]
    fn test_rate_row_uses_native_columns() {
        let id = Uuid::new_v4();
        let currency_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = DbRate {
            id,
            currency_id,
            currency_code: "USD".into(),
            provider_name: "ecb".into(),
            date,
            rate: 1.05,
            nominal: 1.0,
        };

        let rate = row.into_domain().unwrap();

        assert_eq!(rate.id, RateId::from_uuid(id));
        assert_eq!(rate.currency.id, CurrencyId::from_uuid(currency_id));
        assert_eq!(rate.date, date);
    }

    #[test]
    fn test_currency_row_uses_native_id() {
        let id = Uuid::new_v4();
        let row = DbCurrency {
            id,
            code: "EUR".into(),
        };

        let currency = row.into_domain().unwrap();

        assert_eq!(currency.id, CurrencyId::from_uuid(id));
        assert_eq!(currency.code, "EUR");
    }
}
