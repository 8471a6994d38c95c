use std::sync::Arc;
use std::time::Duration;

use crate::redirector::Redirector;
use crate::repository::CachedRepository;
use crate::RedirectorError;
use async_trait::async_trait;
use snip_core::{ReadRepository, Repository, ShortCode, UrlCache};
use tracing::{debug, debug_span, trace, warn, Instrument};

/// Service for handling URL redirects.
///
/// Reads go through a [`CachedRepository`] so warm codes never touch the
/// store. Each successful resolution schedules a hit increment against the
/// store that the caller does not wait for.
pub struct RedirectorService<R, C> {
    lookup: CachedRepository<Arc<R>, Arc<C>>,
    repository: Arc<R>,
}

impl<R, C> Clone for RedirectorService<R, C> {
    fn clone(&self) -> Self {
        Self {
            lookup: self.lookup.clone(),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository, C: UrlCache> RedirectorService<R, C> {
    /// Creates a new RedirectorService.
    ///
    /// # Arguments
    ///
    /// * `repository` - The store holding every URL record
    /// * `cache` - The cache consulted before the store
    /// * `cache_ttl` - TTL for entries written back after a store hit
    pub fn new(repository: Arc<R>, cache: Arc<C>, cache_ttl: Duration) -> Self {
        Self {
            lookup: CachedRepository::new(Arc::clone(&repository), cache, cache_ttl),
            repository,
        }
    }

    fn record_hit(&self, code: &ShortCode) {
        let repository = Arc::clone(&self.repository);
        let code = code.clone();
        let span = debug_span!("record_hit", code = %code);

        tokio::spawn(
            async move {
                match repository.increment_hits(&code).await {
                    Ok(true) => trace!("Hit recorded"),
                    Ok(false) => warn!("Hit not recorded, record is gone"),
                    Err(e) => warn!(error = %e, "Failed to record hit"),
                }
            }
            .instrument(span),
        );
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache> Redirector for RedirectorService<R, C> {
    async fn resolve(&self, code: &ShortCode) -> crate::Result<String> {
        trace!(code = %code, "resolving short code");

        match self.lookup.get_long_url(code).await? {
            Some(long_url) => {
                debug!(code = %code, url = %long_url, "Resolved short code");
                self.record_hit(code);
                Ok(long_url)
            }
            None => {
                trace!(code = %code, "Short code not found");
                Err(RedirectorError::NotFound(code.to_string()))
            }
        }
    }
}
