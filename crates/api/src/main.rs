use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use placement_api::config::{ServerConfig, StoreBackend};
use placement_api::router::build_app_router;
use placement_api::state::AppState;
use placement_db::{MemoryPlacementStore, PgPlacementStore, PlacementStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placement_api=debug,placement_db=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        max_page_limit = config.max_page_limit,
        strict_query_params = config.strict_query_params,
        "Loaded server configuration"
    );

    // --- Record store ---
    let store: Arc<dyn PlacementStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set for the postgres store backend");
            let store = PgPlacementStore::connect(
                database_url,
                config.db_max_connections,
                config.store_timeout(),
            )
            .await
                .expect("Failed to initialise placement store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory placement store; data is not persisted");
            Arc::new(MemoryPlacementStore::new())
        }
    };

    // --- App state + router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState::new(Arc::clone(&store), config);
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if tokio::time::timeout(shutdown_timeout, store.close()).await.is_err() {
        tracing::warn!("Timed out closing placement store");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
