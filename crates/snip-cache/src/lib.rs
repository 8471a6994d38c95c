//! Cache implementations for snip.
//!
//! Both caches map a bare short code to its long URL and expire entries
//! after a TTL (24 hours unless configured otherwise).

pub mod moka;
pub mod redis;

pub use self::moka::MokaUrlCache;
pub use self::redis::{RedisCacheConfig, RedisUrlCache};
pub use snip_core::cache::{Result, UrlCache};
pub use snip_core::CacheError;

use std::time::Duration;

/// Default time-to-live for cache entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
