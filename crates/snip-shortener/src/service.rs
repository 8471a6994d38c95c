use crate::error::ShortenerError;
use crate::shortener::{Shortened, Shortener};
use async_trait::async_trait;
use snip_core::{Repository, ShortCode, StorageError, UrlCache};
use snip_generator::Generator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Settings for [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public base URL short links are built on, e.g. `https://sn.ip`.
    #[builder(setter(into))]
    base_url: String,
    /// TTL for the cache entry written right after a code is created.
    #[builder(default = Duration::from_secs(24 * 60 * 60))]
    cache_ttl: Duration,
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`Repository`], a [`UrlCache`] and a [`Generator`]:
/// - candidates come from the generator and are checked against the store
///   until a free one turns up (no attempt cap)
/// - the store's uniqueness constraint has the final word; losing an
///   insert race just moves on to the next candidate
/// - the cache write after a successful insert is advisory
#[derive(Debug)]
pub struct ShortenerService<R, C, G> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R, C, G> Clone for ShortenerService<R, C, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, C: UrlCache, G: Generator> ShortenerService<R, C, G> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            cache,
            generator: Arc::new(generator),
            settings,
        }
    }

    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl("URL is required".to_string()));
        }
        Ok(())
    }

    /// Draws candidates until one is both absent from the store and accepted
    /// by its insert.
    async fn allocate(&self, long_url: &str) -> Result<ShortCode, ShortenerError> {
        let mut attempts: u64 = 0;

        loop {
            let candidate = self.generator.generate();
            attempts += 1;

            if self.repository.exists(&candidate).await? {
                trace!(code = %candidate, attempts, "Candidate already taken");
                continue;
            }

            match self.repository.insert(&candidate, long_url).await {
                Ok(()) => {
                    debug!(code = %candidate, attempts, "Allocated short code");
                    return Ok(candidate);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %candidate, attempts, "Lost insert race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache, G: Generator> Shortener for ShortenerService<R, C, G> {
    async fn shorten(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        Self::validate_url(long_url)?;

        let code = self.allocate(long_url).await?;

        if let Err(e) = self
            .cache
            .set_url(&code, long_url, Some(self.settings.cache_ttl))
            .await
        {
            warn!(code = %code, error = %e, "Failed to warm cache for new code");
        }

        Ok(Shortened {
            short_url: code.to_url(&self.settings.base_url),
            code,
            long_url: long_url.to_owned(),
        })
    }
}
