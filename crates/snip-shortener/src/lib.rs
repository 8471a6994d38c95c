//! URL shortener service implementation.
//!
//! This crate allocates collision-free short codes, persists them and
//! warms the cache. Core types are re-exported from `snip_core`.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::{Shortened, Shortener};
