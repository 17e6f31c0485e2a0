use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fila_core::{load_config, validate_config, QueueStore, SnapshotStore, SqliteSnapshotStore};
use fila_server::api::{create_router, WsBroadcaster};
use fila_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("FILA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Code style: {:?}", config.queue.code_style);

    let mut queue = QueueStore::new(config.queue.clone());

    // A broken snapshot file must not keep the desk from opening
    if config.snapshot.enabled {
        match SqliteSnapshotStore::new(&config.snapshot.path) {
            Ok(store) => {
                info!("Snapshot store at {:?}", config.snapshot.path);
                let store: Arc<dyn SnapshotStore> = Arc::new(store);
                queue = queue.with_snapshot_store(store, config.snapshot.key.clone());
                info!("Restored {} tickets", queue.snapshot().len());
            }
            Err(e) => {
                warn!("Snapshot store unavailable, running without persistence: {}", e);
            }
        }
    } else {
        info!("Snapshot persistence disabled in config");
    }

    let ws_broadcaster = WsBroadcaster::default();
    let state = Arc::new(AppState::new(config.clone(), queue, ws_broadcaster));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
}
