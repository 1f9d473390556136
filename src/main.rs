//! Template VFS server
//!
//! Serves rendered virtual files over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use template_vfs::api::create_router;
use template_vfs::{spawn_sweep_task, AppState, Config, SweepHandle};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create template store, data store and key generator
/// 4. Start the eviction sweeps of both stores
/// 5. Serve the HTTP gateway on the configured port
/// 6. Stop the sweeps on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "template_vfs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Template VFS server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: template_root={}, template_ttl={:?}, data_ttl={:?}, sweep_interval={:?}, port={}",
        config.template_root.display(),
        config.template_ttl,
        config.data_ttl,
        config.sweep_interval,
        config.server_port
    );

    let state = AppState::from_config(&config).context("invalid configuration")?;
    info!("Stores initialized, templates served from {}", state.templates.root().display());

    let sweepers = vec![
        spawn_sweep_task(state.templates.clone(), config.sweep_interval)?,
        spawn_sweep_task(state.data.clone(), config.sweep_interval)?,
    ];

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

    stop_sweepers(sweepers).await;
    info!("Server shutdown complete");
    Ok(())
}

async fn stop_sweepers(sweepers: Vec<SweepHandle>) {
    for sweeper in sweepers {
        sweeper.stop().await;
    }
    info!("Sweep tasks stopped");
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
