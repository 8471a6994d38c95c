//! Disposable MySQL and Redis containers for integration tests.
//!
//! Every fixture owns its container; dropping the fixture stops it.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
