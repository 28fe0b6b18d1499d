//! Achievement Cache - process entry point
//!
//! Selects the cache backend, starts the background refresher and serves the
//! operational endpoints until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use achievement_cache::api::create_router;
use achievement_cache::upstream::SteamClient;
use achievement_cache::{cache, spawn_refresher, AppState, Config, ReadThrough, Shutdown};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured cache backend
/// 4. Start the background refresher
/// 5. Serve `/health` and `/stats` until SIGINT/SIGTERM
/// 6. Stop the refresher and pending expiry timers
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "achievement_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Achievement Cache");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: port={}, refresh_interval={}s, tracked_users={}, error_policy={:?}",
        config.server_port,
        config.refresh_interval,
        config.refresh_users.len(),
        config.error_policy
    );
    if config.steam_api_key.is_empty() {
        warn!("STEAM_KEY is not set, upstream calls will be rejected");
    }

    let (trigger, shutdown) = Shutdown::channel();

    let cache = cache::connect(&config.backend, shutdown.clone())
        .await
        .context("unable to set up cache")?;

    let upstream = SteamClient::new(
        config.steam_api_url.clone(),
        config.steam_api_key.clone(),
        Duration::from_millis(config.upstream_timeout_ms),
    )
    .context("unable to build upstream client")?;

    let read_through =
        Arc::new(ReadThrough::new(cache, Arc::new(upstream)).with_policy(config.error_policy));

    let refresher = spawn_refresher(
        Arc::clone(&read_through),
        Duration::from_secs(config.refresh_interval),
        config.refresh_users.clone(),
        shutdown,
    );
    info!("Background refresher started");

    let app = create_router(AppState::new(read_through));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    trigger.trigger();
    if let Err(e) = refresher.await {
        warn!(error = %e, "Refresher did not stop cleanly");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
