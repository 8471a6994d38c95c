use async_trait::async_trait;
use snip_core::repository::{ReadRepository, Result, UrlRecord};
use snip_core::{ShortCode, UrlCache};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A read-only repository decorator that adds caching.
///
/// This implementation composes any [`ReadRepository`] with any [`UrlCache`]
/// to provide transparent caching of long URL lookups. The cache is consulted
/// first; a miss and a cache failure are treated alike and fall back to the
/// inner repository. Whenever the inner repository produces a value it is
/// written back to the cache. Cache errors never reach the caller.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
    ttl: Duration,
}

impl<R: ReadRepository, C: UrlCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying read-only repository implementation
    /// * `cache` - The cache implementation (e.g. `RedisUrlCache`)
    /// * `ttl` - TTL for entries backfilled from the inner repository
    pub fn new(inner: R, cache: C, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    async fn backfill(&self, code: &ShortCode, long_url: &str) {
        match self.cache.set_url(code, long_url, Some(self.ttl)).await {
            Ok(()) => trace!(code = %code, "Backfilled cache"),
            Err(e) => warn!(code = %code, error = %e, "Failed to backfill cache"),
        }
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> ReadRepository for CachedRepository<R, C> {
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "Fetching long URL with cache");

        match self.cache.get_url(code).await {
            Ok(Some(long_url)) => {
                debug!(code = %code, "Cache hit");
                return Ok(Some(long_url));
            }
            Ok(None) => {
                trace!(code = %code, "Cache miss, fetching from inner repository");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Cache error on get, falling back to inner repository");
            }
        }

        let long_url = self.inner.get_long_url(code).await?;
        if let Some(ref long_url) = long_url {
            self.backfill(code, long_url).await;
        }
        Ok(long_url)
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        // Full records carry the live hit counter, which the cache doesn't.
        self.inner.get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        trace!(code = %code, "Checking existence via cache");

        match self.cache.get_url(code).await {
            Ok(Some(_)) => {
                debug!(code = %code, "Cache hit indicates code exists");
                return Ok(true);
            }
            Ok(None) => {
                trace!(code = %code, "Cache miss for existence check");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Cache error on existence check, falling back to inner repository");
            }
        }

        self.inner.exists(code).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingRepository, ReadFailingCache};
    use snip_core::testing::{DownCache, DownRepository};
    use snip_cache::MokaUrlCache;
    use snip_core::{Repository, StorageError};
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(60);

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn test_repository() -> (
        CachedRepository<Arc<CountingRepository>, Arc<MokaUrlCache>>,
        Arc<CountingRepository>,
        Arc<MokaUrlCache>,
    ) {
        let inner = Arc::new(CountingRepository::default());
        let cache = Arc::new(MokaUrlCache::new());
        let cached = CachedRepository::new(Arc::clone(&inner), Arc::clone(&cache), TTL);
        (cached, inner, cache)
    }

    #[tokio::test]
    async fn get_from_inner_when_cache_miss() {
        let (cached, inner, cache) = test_repository();
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();

        let result = cached.get_long_url(&c).await.unwrap();

        assert_eq!(result.as_deref(), Some("https://example.com"));
        assert_eq!(inner.lookups(), 1);
        let backfilled = cache.get_url(&c).await.unwrap();
        assert_eq!(backfilled.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn get_from_cache_when_cache_hit() {
        let (cached, inner, cache) = test_repository();
        let c = code("abc123");
        cache.set_url(&c, "https://example.com", None).await.unwrap();

        let result = cached.get_long_url(&c).await.unwrap();

        assert_eq!(result.as_deref(), Some("https://example.com"));
        assert_eq!(inner.lookups(), 0);
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let (cached, inner, _cache) = test_repository();
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();

        cached.get_long_url(&c).await.unwrap();
        cached.get_long_url(&c).await.unwrap();

        assert_eq!(inner.lookups(), 1);
    }

    #[tokio::test]
    async fn missing_everywhere_is_none_and_not_cached() {
        let (cached, inner, cache) = test_repository();
        let c = code("nope");

        assert!(cached.get_long_url(&c).await.unwrap().is_none());
        assert_eq!(inner.lookups(), 1);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn cache_transport_error_falls_back_and_backfills() {
        let inner = Arc::new(CountingRepository::default());
        let cache = Arc::new(ReadFailingCache::default());
        let cached = CachedRepository::new(Arc::clone(&inner), Arc::clone(&cache), TTL);
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();

        let result = cached.get_long_url(&c).await.unwrap();

        assert_eq!(result.as_deref(), Some("https://example.com"));
        let backfilled = cache.0.get_url(&c).await.unwrap();
        assert_eq!(backfilled.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn dead_cache_is_transparent() {
        let inner = Arc::new(CountingRepository::default());
        let cached = CachedRepository::new(Arc::clone(&inner), DownCache, TTL);
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();

        let result = cached.get_long_url(&c).await.unwrap();
        assert_eq!(result.as_deref(), Some("https://example.com"));
        assert!(cached.exists(&c).await.unwrap());
        assert!(!cached.exists(&code("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn store_error_on_miss_is_surfaced() {
        let cached = CachedRepository::new(DownRepository, MokaUrlCache::new(), TTL);

        let err = cached.get_long_url(&code("abc123")).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn cache_hit_survives_store_outage() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");
        cache.set_url(&c, "https://example.com", None).await.unwrap();
        let cached = CachedRepository::new(DownRepository, cache, TTL);

        let result = cached.get_long_url(&c).await.unwrap();
        assert_eq!(result.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn exists_true_when_in_cache() {
        let (cached, _inner, cache) = test_repository();
        let c = code("abc123");
        cache.set_url(&c, "https://example.com", None).await.unwrap();

        assert!(cached.exists(&c).await.unwrap());
    }

    #[tokio::test]
    async fn exists_checks_inner_when_not_in_cache() {
        let (cached, inner, _cache) = test_repository();
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();

        assert!(cached.exists(&c).await.unwrap());
    }

    #[tokio::test]
    async fn get_returns_full_record_from_inner() {
        let (cached, inner, _cache) = test_repository();
        let c = code("abc123");
        inner.insert(&c, "https://example.com").await.unwrap();
        inner.increment_hits(&c).await.unwrap();

        let record = cached.get(&c).await.unwrap().unwrap();
        assert_eq!(record.hits, 1);
    }
}
