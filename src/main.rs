//! Content Cache - cache-aside service for articles and threaded comments

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_cache::cache::{CacheBackend, MemoryCache, RedisCache};
use content_cache::config::CacheBackendKind;
use content_cache::{create_router, spawn_cleanup_task, AppState, Config};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the configured cache backend (and its sweep task for the in-memory one)
/// 4. Build the content service and router
/// 5. Serve until SIGINT/SIGTERM, then shut down gracefully
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting content cache service");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        backend = ?config.cache_backend,
        default_page_size = config.default_page_size,
        "configuration loaded"
    );

    let (backend, cleanup_handle) = open_backend(&config)?;
    let state = AppState::from_config(&config, backend);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Opens the configured cache backend. The Redis client connects lazily, so an unreachable
/// server only degrades reads to the store.
fn open_backend(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheBackend>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackendKind::Memory => {
            let cache = MemoryCache::new(config.max_entries);
            let handle = spawn_cleanup_task(cache.store(), config.cleanup_interval);
            info!(max_entries = config.max_entries, "in-memory cache ready");
            Ok((Arc::new(cache), Some(handle)))
        }
        CacheBackendKind::Redis => {
            let cache = RedisCache::open(&config.redis_url)
                .with_context(|| format!("invalid REDIS_URL {}", config.redis_url))?;
            info!(url = %config.redis_url, "redis cache configured");
            Ok((Arc::new(cache), None))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
