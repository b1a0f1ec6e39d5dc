//! Axum server setup
//!
//! Owns the store for the lifetime of the process: opened before the
//! listener binds (a failed open is logged, not fatal), closed after the
//! last connection drains.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{store::DEFAULT_MAX_CONNECTIONS, Store};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// SQLite database file, created if missing
    pub db_path: PathBuf,

    /// Directory served as static files; must hold `index.html`
    pub public_dir: PathBuf,

    /// Pool size for the store
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            db_path: PathBuf::from("database.sqlite"),
            public_dir: PathBuf::from("public"),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_router())
        .merge(routes::assets::router(public_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = open_store(&config).await;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    serve(listener, store, &config.public_dir, shutdown_signal()).await
}

/// Open the configured store.
///
/// A failed open is logged and does not stop startup: the server listens
/// with a lazily connected store, and every query reports the failure as a
/// 500 until the database becomes reachable.
pub async fn open_store(config: &ServerConfig) -> Store {
    match Store::open_with_options(&config.db_path, config.max_connections).await {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "Connected to SQLite database");
            store
        }
        Err(e) => {
            let store = Store::open_lazy(&config.db_path, config.max_connections);
            tracing::error!(path = %store.path().display(), "Error opening database: {}", e);
            store
        }
    }
}

/// Serve on an already-bound listener until `shutdown` resolves, then close
/// the store.
pub async fn serve<F>(
    listener: TcpListener,
    store: Store,
    public_dir: &Path,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState::new(store.clone()), public_dir);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    // The store is released whether or not serving ended cleanly.
    store.close().await;
    tracing::info!("Database connection closed");

    served?;
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
