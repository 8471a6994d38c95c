//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the types shared by the shortener, the redirector
//! and the storage/cache adapters: the [`ShortCode`] identifier, the
//! persisted [`UrlRecord`], the error taxonomy and the repository and
//! cache contracts.

pub mod cache;
pub mod error;
pub mod repository;
pub mod shortcode;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
