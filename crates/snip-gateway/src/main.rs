use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snip_cache::{MokaUrlCache, RedisCacheConfig, RedisUrlCache};
use snip_core::{Repository, UrlCache};
use snip_gateway::cli::{CacheBackendArg, StorageBackendArg, CLI};
use snip_gateway::{App, AppState, ServiceOptions};
use snip_generator::RandomGenerator;
use snip_storage::{InMemoryRepository, MySqlOptions, MySqlRepository};
use tokio::net::TcpListener;
use tracing::{info, warn};

const MOKA_MAX_CAPACITY: u64 = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = CLI::parse();
    snip_telemetry::init(config.log_format.into(), &config.log_level)?;

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env file");
        }
    }

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        code_length = config.code_length,
        "starting snip"
    );

    let state = match config.storage {
        StorageBackendArg::InMemory => {
            with_cache(&config, Arc::new(InMemoryRepository::new())).await?
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let options = MySqlOptions::builder()
                .connect_timeout(config.connect_timeout())
                .operation_timeout(config.operation_timeout())
                .build();
            let repository = MySqlRepository::connect(mysql_dsn, options)
                .await
                .context("failed to connect to mysql")?;
            info!("Connected to MySQL");
            with_cache(&config, Arc::new(repository)).await?
        }
    };

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "serving HTTP");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn with_cache<R: Repository>(config: &CLI, repository: Arc<R>) -> anyhow::Result<AppState> {
    match config.cache {
        CacheBackendArg::InMemory => {
            let cache = MokaUrlCache::with_ttl(MOKA_MAX_CAPACITY, config.cache_ttl());
            build_state(config, repository, Arc::new(cache))
        }
        CacheBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when cache backend is redis")?;
            let cache_config = RedisCacheConfig::builder()
                .key_prefix(config.redis_key_prefix.clone())
                .default_ttl(config.cache_ttl())
                .connect_timeout(config.connect_timeout())
                .operation_timeout(config.operation_timeout())
                .build();
            let cache = RedisUrlCache::connect(redis_url, cache_config)
                .await
                .context("failed to connect to redis")?;
            info!("Connected to Redis");
            build_state(config, repository, Arc::new(cache))
        }
    }
}

fn build_state<R: Repository, C: UrlCache>(
    config: &CLI,
    repository: Arc<R>,
    cache: Arc<C>,
) -> anyhow::Result<AppState> {
    let generator = RandomGenerator::new(usize::from(config.code_length))?;
    let options = ServiceOptions::builder()
        .base_url(config.base_url.clone())
        .cache_ttl(config.cache_ttl())
        .check_timeout(config.operation_timeout())
        .build();

    Ok(AppState::from_backends(repository, cache, generator, options))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
