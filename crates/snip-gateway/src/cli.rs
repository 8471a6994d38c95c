use clap::{Parser, ValueEnum};
use snip_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "SNIP_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNIP_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SNIP_MYSQL_DSN";
pub const CACHE_BACKEND_ENV: &str = "SNIP_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "SNIP_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "SNIP_REDIS_KEY_PREFIX";
pub const CODE_LENGTH_ENV: &str = "SNIP_CODE_LENGTH";
pub const CACHE_TTL_ENV: &str = "SNIP_CACHE_TTL_SECS";
pub const CONNECT_TIMEOUT_ENV: &str = "SNIP_CONNECT_TIMEOUT_SECS";
pub const OPERATION_TIMEOUT_ENV: &str = "SNIP_OPERATION_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "SNIP_LOG_LEVEL";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip", about = "URL shortening service")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL short links are built on.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = "")]
    pub redis_key_prefix: String,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = 6,
        value_parser = clap::value_parser!(u8).range(1..=32)
    )]
    pub code_length: u8,

    #[arg(long, env = CACHE_TTL_ENV, default_value_t = 86_400)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = CONNECT_TIMEOUT_ENV, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Bounds each store statement and cache command, health checks included.
    #[arg(long, env = OPERATION_TIMEOUT_ENV, default_value_t = 5)]
    pub operation_timeout_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Filter directives used when `RUST_LOG` is unset.
    #[arg(long, env = LOG_LEVEL_ENV, default_value = "info")]
    pub log_level: String,
}

impl CLI {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}
