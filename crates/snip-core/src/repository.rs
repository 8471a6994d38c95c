use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code identifying this record.
    pub code: ShortCode,
    /// The original URL that was shortened.
    pub long_url: String,
    /// When the record was created. Never changes.
    pub created_at: Timestamp,
    /// How many times the code has been resolved.
    pub hits: u64,
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing decorators such as a cache-fronted repository to wrap any store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Looks up the long URL for a given short code by primary key.
    /// Returns `None` if the code does not exist.
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Retrieves the full URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Lightweight liveness check against the backing store.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record with `hits = 0` and `created_at = now`.
    ///
    /// Returns `Err(StorageError::Conflict)` if the code already exists;
    /// an existing record is never overwritten.
    async fn insert(&self, code: &ShortCode, long_url: &str) -> Result<()>;

    /// Atomically increments the hit counter of a record.
    /// Returns `false` if no record exists for the code.
    async fn increment_hits(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for Arc<T> {
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>> {
        (**self).get_long_url(code).await
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for Arc<T> {
    async fn insert(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        (**self).insert(code, long_url).await
    }

    async fn increment_hits(&self, code: &ShortCode) -> Result<bool> {
        (**self).increment_hits(code).await
    }
}
