//! Notebook Cache - HTTP server over a cached notebook store
//!
//! Serves notebooks, notes, sources and chat sessions from an in-memory
//! store, with reads going through the TTL cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notebook_cache::api::create_router;
use notebook_cache::{AppState, CachedStore, Config, MemoryStore};

/// Main entry point for the notebook cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cached store (this starts the expiry sweep)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, drain requests and stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notebook_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting notebook cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}s, sweep_interval={}s, port={}, single_flight={}",
        config.cache_ttl, config.sweep_interval, config.server_port, config.single_flight
    );

    let state = AppState::from_config(&config);
    let store = Arc::clone(&state.store);
    info!("Cached store initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    stop_cache(&store).await;
    info!("Server shutdown complete");
    Ok(())
}

async fn stop_cache(store: &CachedStore<MemoryStore>) {
    let stats = store.cache_stats();
    store.shutdown().await;
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "Cache sweep stopped"
    );
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
