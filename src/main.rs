//! Tiered Cache - HTTP front for a two-level cache
//!
//! Serves a CacheManager built from environment configuration.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiered_cache::api::create_router;
use tiered_cache::{spawn_cleanup_task, AppState, CacheManager, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the cache manager for the configured backend
/// 4. Start background TTL cleanup task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM, then close the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiered_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tiered Cache Server");

    let config = Config::from_env().context("reading cache configuration")?;
    config.validate().context("validating cache configuration")?;
    info!(
        "Configuration loaded: backend={}, ttl={}s, max_size={}MB, port={}, cleanup_interval={}s",
        config.backend,
        config.ttl_seconds,
        config.max_size_mb,
        config.server_port,
        config.cleanup_interval
    );

    let manager = CacheManager::from_config(&config)
        .await
        .context("building cache backend")?;
    let state = AppState {
        cache: Arc::new(manager),
    };

    let cleanup_handle = if config.cleanup_interval > 0 {
        info!("Background cleanup task started");
        Some(spawn_cleanup_task(state.cache.clone(), config.cleanup_interval))
    } else {
        info!("Background cleanup disabled, relying on lazy expiry");
        None
    };

    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
        // Wait for the task to drop its handle on the cache
        let _ = handle.await;
        warn!("Cleanup task aborted");
    }

    // The router has been dropped, so this is normally the last handle
    match Arc::try_unwrap(state.cache) {
        Ok(manager) => manager.close().await,
        Err(_) => warn!("Cache still shared at shutdown, skipping close"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
}
