//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use rates_types::{
    Currency, CurrencyRate, CurrencyRepository, RateKey, RateQuery, RateRepository, RepoError,
};

use crate::RepoOptions;
use crate::types::postgres::{DbCurrency, DbRate};

const SELECT_RATE: &str = r#"SELECT r.id, r.currency_id, c.code AS currency_code, r.provider_name, r.date, r.rate, r.nominal
    FROM currency_rates r
    JOIN currencies c ON c.id = r.currency_id"#;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), RepoError> {
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
async fn run_migrations(pool: &PgPool) -> Result<(), RepoError> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currency_tables_pg.sql"),
        "0001",
    )
    .await
}

async fn table_exists(pool: &PgPool, table: &str) -> Result<bool, RepoError> {
    sqlx::query_scalar(
        r#"SELECT EXISTS (
               SELECT 1 FROM information_schema.tables
               WHERE table_schema = current_schema() AND table_name = $1
           )"#,
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .map_err(|e| RepoError::Database(e.to_string()))
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect(database_url, RepoOptions::default()).await
    }

    /// Connects to the database, running migrations if `options` asks for it.
    pub async fn connect(database_url: &str, options: RepoOptions) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        if options.auto_migrate {
            run_migrations(&pool).await?;
        }
        Ok(Self { pool })
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool).await
    }

    /// Looks up the record for a natural key, locking it for the rest of the transaction.
    async fn find_by_key(
        tx: &mut Transaction<'_, Postgres>,
        key: &RateKey,
    ) -> Result<Option<CurrencyRate>, RepoError> {
        let sql = format!(
            "{} WHERE r.currency_id = $1 AND r.provider_name = $2 AND r.date = $3 LIMIT 1 FOR UPDATE OF r",
            SELECT_RATE
        );

        let row: Option<DbRate> = sqlx::query_as(&sql)
            .bind(key.currency_id.into_uuid())
            .bind(&key.provider_name)
            .bind(key.date)
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
impl CurrencyRepository for PostgresRepo {
    async fn has_currency_schema(&self) -> Result<bool, RepoError> {
        table_exists(&self.pool, "currencies").await
    }

    async fn find_currency_by_code(&self, code: &str) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> =
            sqlx::query_as(r#"SELECT id, code FROM currencies WHERE code = $1"#)
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
        sqlx::query(r#"INSERT INTO currencies (id, code) VALUES ($1, $2)"#)
            .bind(currency.id.into_uuid())
            .bind(&currency.code)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RateRepository for PostgresRepo {
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

                    sqlx::query(r#"UPDATE currency_rates SET rate = $1, nominal = $2 WHERE id = $3"#)
                        .bind(existing.rate)
                        .bind(existing.nominal)
                        .bind(existing.id.into_uuid())
                        .execute(&mut *db_tx)
                        .await
                        .map_err(|e| RepoError::Database(e.to_string()))?;

                    saved.push(existing);
                }
                None => {
                    sqlx::query(
                        r#"INSERT INTO currency_rates (id, currency_id, provider_name, date, rate, nominal)
                           VALUES ($1, $2, $3, $4, $5, $6)"#,
                    )
                    .bind(candidate.id.into_uuid())
                    .bind(candidate.currency.id.into_uuid())
                    .bind(&candidate.provider_name)
                    .bind(candidate.date)
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
            "{} WHERE c.code = $1
               AND ($2::text IS NULL OR r.provider_name = $2)
               AND ($3::timestamp IS NULL OR r.date = $3)
             ORDER BY r.date DESC, r.provider_name ASC
             LIMIT $4",
            SELECT_RATE
        );

        // LIMIT NULL returns every row.
        let rows: Vec<DbRate> = sqlx::query_as(&sql)
            .bind(&query.currency_code)
            .bind(&query.provider_name)
            .bind(query.date)
            .bind(limit.map(i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRate::into_domain).collect()
    }
}
