use crate::Result;
use async_trait::async_trait;
use snip_core::ShortCode;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its long URL.
    ///
    /// Fails with [`RedirectorError::NotFound`](crate::RedirectorError::NotFound)
    /// when no record exists, which callers can tell apart from store trouble.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;
}
