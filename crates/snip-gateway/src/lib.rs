//! HTTP surface of snip.
//!
//! [`App::router`] mounts the shorten, redirect and health endpoints on top
//! of an [`AppState`] that holds the services as trait objects, so the
//! router never sees which store or cache sits behind them.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod health;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use health::{Dependency, HealthChecker, HealthStatus};
pub use state::{AppState, ServiceOptions};
