//! Tracing subscriber setup shared by the snip binaries.
//!
//! Call [`init`] once at startup. Events are filtered by `RUST_LOG` when it
//! is set, otherwise by the level handed in, and written to stdout either
//! as human readable lines or as one JSON object per line. Records emitted
//! through the `log` facade are forwarded into `tracing`.

use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install log bridge: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Installs the global subscriber.
///
/// `level` is any `EnvFilter` directive string (`info`, `snip_gateway=debug,warn`)
/// and only applies when `RUST_LOG` is absent. Fails if a subscriber is
/// already installed.
pub fn init(format: LogFormat, level: &str) -> Result<(), TelemetryError> {
    let filter = resolve_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), level)?;

    tracing_log::LogTracer::init()?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => {
            tracing::subscriber::set_global_default(
                registry.with(tracing_subscriber::fmt::layer().with_target(true)),
            )?;
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(
                registry.with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false),
                ),
            )?;
        }
    }

    Ok(())
}

/// Picks the directives from the environment when present and non-empty,
/// else from `fallback`.
fn resolve_filter(from_env: Option<String>, fallback: &str) -> Result<EnvFilter, ParseError> {
    match from_env.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives),
        None => EnvFilter::try_new(fallback),
    }
}
