use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use snip_core::{ReadRepository, UrlCache};
use tracing::trace;

/// A backing service the health check depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Database,
    Cache,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Database => f.write_str("Database"),
            Dependency::Cache => f.write_str("Cache"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy { dependency: Dependency, reason: String },
}

/// Pings the store, then the cache, and reports the first one that fails.
///
/// Each check is bounded by its own timeout; a check that runs out of time
/// counts as a failure of that dependency.
pub struct HealthChecker {
    repository: Arc<dyn ReadRepository>,
    cache: Arc<dyn UrlCache>,
    check_timeout: Duration,
}

impl HealthChecker {
    pub fn new(
        repository: Arc<dyn ReadRepository>,
        cache: Arc<dyn UrlCache>,
        check_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            check_timeout,
        }
    }

    pub async fn check(&self) -> HealthStatus {
        if let Err(reason) = check_backend(self.check_timeout, self.repository.ping()).await {
            return HealthStatus::Unhealthy {
                dependency: Dependency::Database,
                reason,
            };
        }
        if let Err(reason) = check_backend(self.check_timeout, self.cache.ping()).await {
            return HealthStatus::Unhealthy {
                dependency: Dependency::Cache,
                reason,
            };
        }

        trace!("All dependencies healthy");
        HealthStatus::Healthy
    }
}

async fn check_backend<E, F>(limit: Duration, ping: F) -> Result<(), String>
where
    E: fmt::Display,
    F: Future<Output = Result<(), E>>,
{
    match tokio::time::timeout(limit, ping).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("no answer within {limit:?}")),
    }
}
