//! Backends that fail on purpose, for tests in downstream crates.
//!
//! Enabled by the `testing` feature.

use crate::cache::{self, UrlCache};
use crate::repository::{self, ReadRepository, Repository, UrlRecord};
use crate::{CacheError, ShortCode, StorageError};
use async_trait::async_trait;
use std::time::Duration;

fn refused<T>() -> repository::Result<T> {
    Err(StorageError::Unavailable("connection refused".to_string()))
}

fn unreachable_cache<T>() -> cache::Result<T> {
    Err(CacheError::Unavailable("connection refused".to_string()))
}

/// A store that refuses every connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownRepository;

#[async_trait]
impl ReadRepository for DownRepository {
    async fn get_long_url(&self, _code: &ShortCode) -> repository::Result<Option<String>> {
        refused()
    }

    async fn get(&self, _code: &ShortCode) -> repository::Result<Option<UrlRecord>> {
        refused()
    }

    async fn exists(&self, _code: &ShortCode) -> repository::Result<bool> {
        refused()
    }

    async fn ping(&self) -> repository::Result<()> {
        refused()
    }
}

#[async_trait]
impl Repository for DownRepository {
    async fn insert(&self, _code: &ShortCode, _long_url: &str) -> repository::Result<()> {
        refused()
    }

    async fn increment_hits(&self, _code: &ShortCode) -> repository::Result<bool> {
        refused()
    }
}

/// A cache whose backend is permanently down.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownCache;

#[async_trait]
impl UrlCache for DownCache {
    async fn get_url(&self, _code: &ShortCode) -> cache::Result<Option<String>> {
        unreachable_cache()
    }

    async fn set_url(
        &self,
        _code: &ShortCode,
        _long_url: &str,
        _ttl: Option<Duration>,
    ) -> cache::Result<()> {
        unreachable_cache()
    }

    async fn ping(&self) -> cache::Result<()> {
        unreachable_cache()
    }
}

/// A cache that answers reads and writes but whose ping never returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct StalledCache;

#[async_trait]
impl UrlCache for StalledCache {
    async fn get_url(&self, _code: &ShortCode) -> cache::Result<Option<String>> {
        Ok(None)
    }

    async fn set_url(
        &self,
        _code: &ShortCode,
        _long_url: &str,
        _ttl: Option<Duration>,
    ) -> cache::Result<()> {
        Ok(())
    }

    async fn ping(&self) -> cache::Result<()> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn down_backends_report_unavailable() {
        let code = ShortCode::new_unchecked("abc123");

        assert!(matches!(
            DownRepository.get_long_url(&code).await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            DownRepository.insert(&code, "https://example.com").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            DownCache.get_url(&code).await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(matches!(DownCache.ping().await, Err(CacheError::Unavailable(_))));
    }

    #[tokio::test]
    async fn stalled_cache_ping_never_returns() {
        let ping = tokio::time::timeout(Duration::from_millis(20), StalledCache.ping()).await;
        assert!(ping.is_err());
    }
}
