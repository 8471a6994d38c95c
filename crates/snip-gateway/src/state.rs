use std::sync::Arc;
use std::time::Duration;

use snip_cache::DEFAULT_TTL;
use snip_core::{Repository, UrlCache};
use snip_generator::Generator;
use snip_redirector::{Redirector, RedirectorService};
use snip_shortener::{Shortener, ShortenerService, ShortenerSettings};
use typed_builder::TypedBuilder;

use crate::health::HealthChecker;

/// Knobs shared by the services behind the router.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceOptions {
    #[builder(setter(into))]
    base_url: String,
    #[builder(default = DEFAULT_TTL)]
    cache_ttl: Duration,
    #[builder(default = Duration::from_secs(5))]
    check_timeout: Duration,
}

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    health: Arc<HealthChecker>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        health: Arc<HealthChecker>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            health,
        }
    }

    /// Builds every service on top of one store and one cache.
    pub fn from_backends<R, C, G>(
        repository: Arc<R>,
        cache: Arc<C>,
        generator: G,
        options: ServiceOptions,
    ) -> Self
    where
        R: Repository,
        C: UrlCache,
        G: Generator,
    {
        let settings = ShortenerSettings::builder()
            .base_url(options.base_url)
            .cache_ttl(options.cache_ttl)
            .build();
        let shortener =
            ShortenerService::new(Arc::clone(&repository), Arc::clone(&cache), generator, settings);
        let redirector =
            RedirectorService::new(Arc::clone(&repository), Arc::clone(&cache), options.cache_ttl);
        let health = HealthChecker::new(repository, cache, options.check_timeout);

        Self::new(Arc::new(shortener), Arc::new(redirector), Arc::new(health))
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn health(&self) -> &HealthChecker {
        &self.health
    }
}
