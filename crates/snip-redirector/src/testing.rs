//! Test doubles that wrap working backends.

use async_trait::async_trait;
use snip_cache::MokaUrlCache;
use snip_core::repository::{ReadRepository, Repository, Result as StorageResult, UrlRecord};
use snip_core::{cache, CacheError, ShortCode, UrlCache};
use snip_storage::InMemoryRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A cache whose reads fail in transport while writes still land.
#[derive(Default)]
pub struct ReadFailingCache(pub MokaUrlCache);

#[async_trait]
impl UrlCache for ReadFailingCache {
    async fn get_url(&self, _code: &ShortCode) -> cache::Result<Option<String>> {
        Err(CacheError::Unavailable("connection reset".to_string()))
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        long_url: &str,
        ttl: Option<Duration>,
    ) -> cache::Result<()> {
        self.0.set_url(code, long_url, ttl).await
    }

    async fn ping(&self) -> cache::Result<()> {
        Ok(())
    }
}

/// An in-memory store that counts primary key lookups.
#[derive(Default)]
pub struct CountingRepository {
    pub inner: InMemoryRepository,
    lookups: AtomicUsize,
}

impl CountingRepository {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadRepository for CountingRepository {
    async fn get_long_url(&self, code: &ShortCode) -> StorageResult<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_long_url(code).await
    }

    async fn get(&self, code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
        self.inner.get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> StorageResult<bool> {
        self.inner.exists(code).await
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl Repository for CountingRepository {
    async fn insert(&self, code: &ShortCode, long_url: &str) -> StorageResult<()> {
        self.inner.insert(code, long_url).await
    }

    async fn increment_hits(&self, code: &ShortCode) -> StorageResult<bool> {
        self.inner.increment_hits(code).await
    }
}
