use crate::error::ShortenerError;
use async_trait::async_trait;
use snip_core::ShortCode;

type Result<T> = std::result::Result<T, ShortenerError>;

/// The outcome of a successful [`Shortener::shorten`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The freshly allocated short code.
    pub code: ShortCode,
    /// `base_url + "/" + code`.
    pub short_url: String,
    /// The URL that was shortened, exactly as submitted.
    pub long_url: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates an unused short code for `long_url` and persists the mapping.
    async fn shorten(&self, long_url: &str) -> Result<Shortened>;
}
