use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// An ephemeral code → long URL cache.
///
/// The cache is a derived view of the store and never authoritative.
/// A miss is `Ok(None)`; transport or backend trouble is `Err(_)`, so callers
/// can tell the two apart even though both end in a store lookup.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the long URL for a code.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Store the long URL for a code with an optional TTL.
    ///
    /// If `ttl` is `None`, the entry uses the implementation's default
    /// expiration policy.
    async fn set_url(&self, code: &ShortCode, long_url: &str, ttl: Option<Duration>)
        -> Result<()>;

    /// Lightweight liveness check against the cache backend.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<T: UrlCache + ?Sized> UrlCache for Arc<T> {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        (**self).get_url(code).await
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        long_url: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        (**self).set_url(code, long_url, ttl).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
