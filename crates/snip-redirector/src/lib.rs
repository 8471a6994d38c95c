//! Redirector service library with caching support.
//!
//! This crate provides a [`RedirectorService`] that resolves short codes
//! to their original URLs. Lookups go through a [`CachedRepository`], a
//! Repository decorator that consults any [`UrlCache`] before the store and
//! backfills it on the way out. Every successful resolution also bumps the
//! record's hit counter in a detached task.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snip_redirector::{Redirector, RedirectorService};
//! # use snip_core::{Repository, ShortCode, UrlCache};
//!
//! # async fn example<R: Repository, C: UrlCache>(repo: Arc<R>, cache: Arc<C>)
//! # -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedirectorService::new(repo, cache, Duration::from_secs(86_400));
//!
//! let code = ShortCode::new("abc123")?;
//! let long_url = service.resolve(&code).await?;
//! println!("Redirect to: {long_url}");
//! # Ok(())
//! # }
//! ```
//!
//! [`UrlCache`]: snip_core::UrlCache

pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
