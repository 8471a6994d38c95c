use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use snip_core::cache::{Result, UrlCache};
use snip_core::ShortCode;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A cached long URL together with the TTL it was written with.
#[derive(Debug, Clone)]
struct CachedUrl {
    long_url: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was last written with.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-memory cache implementation using Moka.
///
/// Stores long URLs in a concurrent, bounded in-memory cache. Suited to
/// single-node deployments and tests; every write refreshes the entry's TTL,
/// mirroring `SET ... EX` semantics.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache holds at most 10,000 entries with a 24 hour default TTL.
    pub fn new() -> Self {
        Self::with_ttl(10_000, crate::DEFAULT_TTL)
    }

    /// Creates a new Moka URL cache with a custom capacity and default TTL.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL used when a write does not specify one
    pub fn with_ttl(max_capacity: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache, default_ttl }
    }

    /// Number of live entries, after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "Fetching long URL from Moka cache");

        match self.cache.get(code.as_str()).await {
            Some(entry) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(entry.long_url))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        long_url: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        trace!(code = %code, "Storing long URL in Moka cache");

        let entry = CachedUrl {
            long_url: long_url.to_owned(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.cache.insert(code.as_str().to_owned(), entry).await;
        debug!(code = %code, "Cached long URL in Moka");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn get_and_set() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");

        assert!(cache.get_url(&c).await.unwrap().is_none());

        cache.set_url(&c, "https://example.com", None).await.unwrap();

        let url = cache.get_url(&c).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com"));
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn set_overwrites_value() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");

        cache.set_url(&c, "https://old.example", None).await.unwrap();
        cache.set_url(&c, "https://new.example", None).await.unwrap();

        let url = cache.get_url(&c).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://new.example"));
    }

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let cache = MokaUrlCache::new();
        let c = code("short1");

        cache
            .set_url(&c, "https://example.com", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.get_url(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn default_ttl_applies_when_unspecified() {
        let cache = MokaUrlCache::with_ttl(100, Duration::from_millis(50));
        let c = code("short2");

        cache.set_url(&c, "https://example.com", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.get_url(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rewrite_refreshes_ttl() {
        let cache = MokaUrlCache::new();
        let c = code("short3");

        cache
            .set_url(&c, "https://example.com", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        cache
            .set_url(&c, "https://example.com", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.get_url(&c).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn ping_is_always_ok() {
        assert!(MokaUrlCache::new().ping().await.is_ok());
    }
}
