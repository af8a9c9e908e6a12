//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use rates_types::{
    Currency, CurrencyRate, CurrencyRepository, RateKey, RateQuery, RateRepository, RepoError,
};

use crate::RepoOptions;
use crate::types::sqlite::{DbCurrency, DbRate, format_date};

const SELECT_RATE: &str = r#"SELECT r.id, r.currency_id, c.code AS currency_code, r.provider_name, r.date, r.rate, r.nominal
    FROM currency_rates r
    JOIN currencies c ON c.id = r.currency_id"#;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> Result<(), RepoError> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| RepoError::Migration(format!("{} failed: {}", name, e)))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), RepoError> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currency_tables.sql"),
        "0001",
    )
    .await
}

async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, RepoError> {
    let count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?"#)
            .bind(table)
            .fetch_one(pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
    Ok(count > 0)
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect(database_url, RepoOptions::default()).await
    }

    /// Connects to the database, running migrations if `options` asks for it.
    pub async fn connect(database_url: &str, options: RepoOptions) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database sees its own empty database,
        // so keep exactly one and never recycle it.
        let pool = if database_url.contains(":memory:") || database_url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(connect_options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(connect_options).await?
        };

        if options.auto_migrate {
            run_migrations(&pool).await?;
        }

        tracing::debug!("SQLite repository ready at {}", database_url);

        Ok(Self { pool })
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool).await
    }

    async fn find_by_key(
        tx: &mut Transaction<'_, Sqlite>,
        key: &RateKey,
    ) -> Result<Option<CurrencyRate>, RepoError> {
        let sql = format!(
            "{} WHERE r.currency_id = ? AND r.provider_name = ? AND r.date = ? LIMIT 1",
            SELECT_RATE
        );

        let row: Option<DbRate> = sqlx::query_as(&sql)
            .bind(key.currency_id.to_string())
            .bind(&key.provider_name)
            .bind(format_date(key.date)?)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbRate::into_domain).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CurrencyRepository for SqliteRepo {
    async fn has_currency_schema(&self) -> Result<bool, RepoError> {
        table_exists(&self.pool, "currencies").await
    }

    async fn find_currency_by_code(&self, code: &str) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> =
            sqlx::query_as(r#"SELECT id, code FROM currencies WHERE code = ?"#)
                .bind(code)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<DbCurrency> =
            sqlx::query_as(r#"SELECT id, code FROM currencies ORDER BY code ASC"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbCurrency::into_domain).collect()
    }

    async fn insert_currency(&self, currency: &Currency) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO currencies (id, code) VALUES (?, ?)"#)
            .bind(currency.id.to_string())
            .bind(&currency.code)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RateRepository for SqliteRepo {
    async fn has_rate_schema(&self) -> Result<bool, RepoError> {
        table_exists(&self.pool, "currency_rates").await
    }

    async fn save_rates(&self, rates: Vec<CurrencyRate>) -> Result<Vec<CurrencyRate>, RepoError> {
        if rates.is_empty() {
            return Ok(rates);
        }

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let mut saved = Vec::with_capacity(rates.len());

        for candidate in rates {
            match Self::find_by_key(&mut db_tx, &candidate.key()).await? {
                Some(mut existing) => {
                    existing.update_from(&candidate);

                    sqlx::query(r#"UPDATE currency_rates SET rate = ?, nominal = ? WHERE id = ?"#)
                        .bind(existing.rate)
                        .bind(existing.nominal)
                        .bind(existing.id.to_string())
                        .execute(&mut *db_tx)
                        .await
                        .map_err(|e| RepoError::Database(e.to_string()))?;

                    saved.push(existing);
                }
                None => {
                    sqlx::query(
                        r#"INSERT INTO currency_rates (id, currency_id, provider_name, date, rate, nominal)
                           VALUES (?, ?, ?, ?, ?, ?)"#,
                    )
                    .bind(candidate.id.to_string())
                    .bind(candidate.currency.id.to_string())
                    .bind(&candidate.provider_name)
                    .bind(format_date(candidate.date)?)
                    .bind(candidate.rate)
                    .bind(candidate.nominal)
                    .execute(&mut *db_tx)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;

                    saved.push(candidate);
                }
            }
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(saved)
    }

    async fn find_rates(
        &self,
        query: &RateQuery,
        limit: Option<u32>,
    ) -> Result<Vec<CurrencyRate>, RepoError> {
        let sql = format!(
            "{} WHERE c.code = ?
               AND (? IS NULL OR r.provider_name = ?)
               AND (? IS NULL OR r.date = ?)
             ORDER BY r.date DESC, r.provider_name ASC
             LIMIT ?",
            SELECT_RATE
        );
        let date = query.date.map(format_date).transpose()?;
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, i64::from);

        let rows: Vec<DbRate> = sqlx::query_as(&sql)
            .bind(&query.currency_code)
            .bind(&query.provider_name)
            .bind(&query.provider_name)
            .bind(&date)
            .bind(&date)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRate::into_domain).collect()
    }
}
