use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod store;

use crate::config::Config;
use crate::store::FruitStore;

/// Shared application state, cheap to clone (the store sits behind an Arc).
///
/// Reads take the lock shared, mutations take it exclusively, so each
/// create/update/delete is applied atomically with respect to the others.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<FruitStore>>,
}

impl AppState {
    pub fn new(store: FruitStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,fruit_inventory=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Fresh Fruit Inventory (Rust + Axum, in-memory store)");

    let app = build_router(AppState::new(FruitStore::new()));

    let addr = config.addr();
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Root / health ───────────────────────────────────────────────────
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))

        // ── Fruits ──────────────────────────────────────────────────────────
        .route(
            "/api/fruits",
            get(handlers::fruits::list_fruits).post(handlers::fruits::create_fruit),
        )
        .route(
            "/api/fruits/:id",
            get(handlers::fruits::get_fruit)
                .patch(handlers::fruits::update_fruit)
                .delete(handlers::fruits::delete_fruit),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
