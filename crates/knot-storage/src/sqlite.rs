use async_trait::async_trait;
use jiff::Timestamp;
use knot_core::error::{StoreError, StoreResult};
use knot_core::{IdAllocator, ShortCode, UrlRecord, UrlStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

/// SQLite implementation of [`UrlStore`].
///
/// The `urls` table carries the primary key on `short_code` and a
/// unique index on `original_url`; the database rejects the loser of a
/// dedup race with a unique violation, which surfaces as
/// [`StoreError::Conflict`]. Click accounting is a single
/// `SET clicks = clicks + 1` statement, never a read-modify-write at
/// the caller.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store from an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new pool, creating the database
    /// file if it does not exist yet.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the tables and seeds the id sequence. Idempotent; run
    /// once at startup.
    pub async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                short_code   TEXT PRIMARY KEY,
                original_url TEXT UNIQUE NOT NULL,
                clicks       INTEGER NOT NULL DEFAULT 0,
                created_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS url_ids (
                id    INTEGER PRIMARY KEY CHECK (id = 0),
                value INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("INSERT OR IGNORE INTO url_ids (id, value) VALUES (0, 0)")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!("sqlite schema initialized");
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> StoreResult<UrlRecord> {
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let clicks_raw: i64 = row.try_get("clicks").map_err(map_sqlx_error)?;
    let created_at_raw: String = row.try_get("created_at").map_err(map_sqlx_error)?;

    let clicks = u64::try_from(clicks_raw).map_err(|_| {
        StoreError::InvalidData(format!("negative click count {} for '{}'", clicks_raw, short_code))
    })?;
    let created_at = created_at_raw.parse::<Timestamp>().map_err(|e| {
        StoreError::InvalidData(format!("invalid created_at '{}': {}", created_at_raw, e))
    })?;

    Ok(UrlRecord {
        code: ShortCode::new(short_code),
        original_url,
        clicks,
        created_at,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl UrlStore for SqliteStore {
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, clicks, created_at
            FROM urls
            WHERE original_url = ?
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_code(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, clicks, created_at
            FROM urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn insert(&self, record: UrlRecord) -> StoreResult<()> {
        let clicks = i64::try_from(record.clicks).map_err(|_| {
            StoreError::InvalidData(format!("click count {} overflows storage", record.clicks))
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO urls (short_code, original_url, clicks, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.original_url)
        .bind(clicks)
        .bind(record.created_at.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(format!(
                "code '{}' or url '{}' already exists",
                record.code, record.original_url
            ))),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> StoreResult<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            UPDATE urls
            SET clicks = clicks + 1
            WHERE short_code = ?
            RETURNING short_code, original_url, clicks, created_at
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

/// A store-native id sequence backed by the single-row `url_ids` table.
///
/// The increment and the read happen in one `UPDATE ... RETURNING`
/// statement, so concurrent callers can never observe the same value.
/// This deliberately replaces any count-the-rows scheme, which is racy
/// under concurrent writers.
#[derive(Debug, Clone)]
pub struct SqliteSequence {
    pool: SqlitePool,
}

impl SqliteSequence {
    /// Creates a sequence over an existing pool. The schema (including
    /// the seeded sequence row) must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdAllocator for SqliteSequence {
    async fn next_id(&self) -> StoreResult<u64> {
        let row = sqlx::query(
            r#"
            UPDATE url_ids
            SET value = value + 1
            WHERE id = 0
            RETURNING value
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StoreError::InvalidData(
                "id sequence row is missing; schema was not initialized".to_string(),
            ));
        };

        let value: i64 = row.try_get("value").map_err(map_sqlx_error)?;
        u64::try_from(value).map_err(|_| {
            StoreError::InvalidData(format!("id sequence produced negative value {}", value))
        })
    }
}
