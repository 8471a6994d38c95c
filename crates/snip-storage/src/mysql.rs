use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{ShortCode, StorageError};
use sqlx::mysql::{MySqlConnection, MySqlPoolOptions};
use sqlx::{Connection, MySqlPool, Row};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;
use url::Url;

const SCHEMA: &str = include_str!("../ddl/mysql/urls.sql");

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`MySqlRepository::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlOptions {
    #[builder(default = 10)]
    max_connections: u32,
    /// Bounds connection establishment and every pool acquire.
    #[builder(default = Duration::from_secs(10))]
    connect_timeout: Duration,
    /// Bounds every statement once a connection is checked out.
    #[builder(default = DEFAULT_OPERATION_TIMEOUT)]
    operation_timeout: Duration,
}

impl Default for MySqlOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// MySQL implementation of the repository contract.
///
/// Records live in a single `urls` table. The unique index on `code` is what
/// actually guarantees code uniqueness; [`Repository::insert`] reports its
/// violation as [`StorageError::Conflict`] rather than overwriting.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
    operation_timeout: Duration,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Replaces the per-statement time limit.
    pub fn with_operation_timeout(mut self, limit: Duration) -> Self {
        self.operation_timeout = limit;
        self
    }

    /// Opens a pool for `database_url` after provisioning the database it
    /// names (if absent) and the `urls` table (if absent).
    pub async fn connect(database_url: &str, options: MySqlOptions) -> Result<Self> {
        create_database_if_missing(database_url, options.connect_timeout).await?;

        let pool = with_timeout(
            options.connect_timeout,
            MySqlPoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(options.connect_timeout)
                .connect(database_url),
        )
        .await?
        .map_err(map_sqlx_error)?;

        let repository = Self::new(pool).with_operation_timeout(options.operation_timeout);
        repository.provision().await?;
        Ok(repository)
    }

    /// Creates the `urls` table if it does not exist yet.
    pub async fn provision(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Provisioning(format!("failed to create table: {e}")))?;
        debug!("urls table is present");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, statement: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        with_timeout(self.operation_timeout, statement)
            .await?
            .map_err(map_sqlx_error)
    }
}

async fn with_timeout<F: Future>(limit: Duration, fut: F) -> Result<F::Output> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StorageError::Timeout(format!("no response within {limit:?}")))
}

/// Splits a DSN into the server-level URL and the database name in its path.
fn split_database(database_url: &str) -> Result<(Url, Option<String>)> {
    let mut server = Url::parse(database_url)
        .map_err(|e| StorageError::Provisioning(format!("invalid database url: {e}")))?;

    let database = server.path().trim_matches('/').to_owned();
    server.set_path("");

    if database.is_empty() {
        return Ok((server, None));
    }

    if !database
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(StorageError::Provisioning(format!(
            "unsupported database name '{database}'"
        )));
    }

    Ok((server, Some(database)))
}

async fn create_database_if_missing(database_url: &str, limit: Duration) -> Result<()> {
    let (server, Some(database)) = split_database(database_url)? else {
        return Ok(());
    };

    let mut conn = with_timeout(limit, MySqlConnection::connect(server.as_str()))
        .await?
        .map_err(map_sqlx_error)?;

    // Identifiers cannot be bound as parameters; the name was checked above.
    sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS `{database}`"))
        .execute(&mut conn)
        .await
        .map_err(|e| StorageError::Provisioning(format!("failed to create database: {e}")))?;

    conn.close().await.map_err(map_sqlx_error)?;
    info!(database = %database, "database is present");
    Ok(())
}

fn parse_created_at(seconds: Option<i64>) -> Result<Timestamp> {
    let seconds = seconds
        .ok_or_else(|| StorageError::InvalidData("created_at is NULL".to_string()))?;
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>> {
        let row = self
            .bounded(
                sqlx::query("SELECT long_url FROM urls WHERE code = ? LIMIT 1")
                    .bind(code.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(|row| row.try_get("long_url").map_err(map_sqlx_error))
            .transpose()
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = self
            .bounded(
                sqlx::query(
                    r#"
                    SELECT long_url,
                           CAST(UNIX_TIMESTAMP(created_at) AS SIGNED) AS created_at,
                           hits
                    FROM urls
                    WHERE code = ?
                    LIMIT 1
                    "#,
                )
                .bind(code.as_str())
                .fetch_optional(&self.pool),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
        let created_at: Option<i64> = row.try_get("created_at").map_err(map_sqlx_error)?;
        let hits: u64 = row.try_get("hits").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord {
            code: code.clone(),
            long_url,
            created_at: parse_created_at(created_at)?,
            hits,
        }))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = self
            .bounded(
                sqlx::query("SELECT 1 FROM urls WHERE code = ? LIMIT 1")
                    .bind(code.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?
            .is_some();

        Ok(exists)
    }

    async fn ping(&self) -> Result<()> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        // Not `bounded`: the raw error is needed to spot the unique violation.
        let result = with_timeout(
            self.operation_timeout,
            sqlx::query("INSERT INTO urls (code, long_url) VALUES (?, ?)")
                .bind(code.as_str())
                .bind(long_url)
                .execute(&self.pool),
        )
        .await?;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn increment_hits(&self, code: &ShortCode) -> Result<bool> {
        let result = self
            .bounded(
                sqlx::query("UPDATE urls SET hits = hits + 1 WHERE code = ?")
                    .bind(code.as_str())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
