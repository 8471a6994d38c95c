use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use snip_core::cache::{Result, UrlCache};
use snip_core::{CacheError, ShortCode};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Settings for [`RedisUrlCache`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisCacheConfig {
    /// Prefix prepended to every key. Empty means keys are bare codes.
    #[builder(default, setter(into))]
    key_prefix: String,
    /// TTL used when a write does not specify one.
    #[builder(default = crate::DEFAULT_TTL)]
    default_ttl: Duration,
    /// Bounds connection establishment and the initial ping.
    #[builder(default = Duration::from_secs(10))]
    connect_timeout: Duration,
    /// Bounds every command after the connection is up.
    #[builder(default = Duration::from_secs(5))]
    operation_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A Redis-based implementation of [`UrlCache`].
///
/// Values are stored as plain strings (`SET code long_url EX ttl`). The
/// connection manager reconnects on its own after transport failures, so a
/// Redis outage only costs cache hits until it comes back.
#[derive(Clone)]
pub struct RedisUrlCache {
    conn: ConnectionManager,
    config: RedisCacheConfig,
}

impl std::fmt::Debug for RedisUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Wraps an existing connection manager.
    pub fn new(conn: ConnectionManager, config: RedisCacheConfig) -> Self {
        Self { conn, config }
    }

    /// Connects to `redis_url` and verifies the server answers a `PING`,
    /// both within the configured connect timeout.
    pub async fn connect(redis_url: &str, config: RedisCacheConfig) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Initialization(format!("invalid redis url: {e}")))?;

        let limit = config.connect_timeout;
        let conn = tokio::time::timeout(limit, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(format!("connecting to redis took over {limit:?}")))?
            .map_err(|e| CacheError::Initialization(format!("failed to connect to redis: {e}")))?;

        let cache = Self::new(conn, config);
        cache.bounded(limit, "PING", cache.ping_once()).await?;
        Ok(cache)
    }

    /// Generates the cache key for a short code.
    fn cache_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.config.key_prefix, code.as_str())
    }

    async fn ping_once(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_redis_error("failed to ping Redis", e))
    }

    async fn bounded<T>(
        &self,
        limit: Duration,
        operation: &str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| CacheError::Timeout(format!("{operation} took over {limit:?}")))?
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = self.cache_key(code);
        trace!(code = %code, "Fetching long URL from Redis cache");

        let mut conn = self.conn.clone();
        let result = self
            .bounded(self.config.operation_timeout, "GET", async {
                conn.get::<_, Option<String>>(&key)
                    .await
                    .map_err(|e| map_redis_error("failed to fetch value from Redis", e))
            })
            .await;

        match result {
            Ok(Some(url)) => {
                debug!(code = %code, "Cache hit in Redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(code = %code, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Redis error on get");
                Err(e)
            }
        }
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        long_url: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let key = self.cache_key(code);
        // EX rejects 0, so sub-second TTLs round up to one second.
        let seconds = ttl.unwrap_or(self.config.default_ttl).as_secs().max(1);
        trace!(code = %code, ttl_secs = seconds, "Storing long URL in Redis cache");

        let mut conn = self.conn.clone();
        let result = self
            .bounded(self.config.operation_timeout, "SET", async {
                conn.set_ex::<_, _, ()>(&key, long_url, seconds)
                    .await
                    .map_err(|e| map_redis_error("failed to write value to Redis", e))
            })
            .await;

        match result {
            Ok(()) => {
                debug!(code = %code, "Cached long URL in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Failed to cache long URL in Redis");
                Err(e)
            }
        }
    }

    async fn ping(&self) -> Result<()> {
        self.bounded(self.config.operation_timeout, "PING", self.ping_once())
            .await
    }
}
