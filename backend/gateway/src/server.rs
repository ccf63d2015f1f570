//! HTTP settings server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use ccswitch_config::StateStore;
use ccswitch_supervisor::ProcessTable;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::api;

/// Application state shared across routes.
pub struct GatewayState {
    pub store: StateStore,
    pub processes: ProcessTable,
}

impl GatewayState {
    /// State and process table rooted in the same config directory.
    pub fn for_dir(dir: &Path) -> Self {
        Self {
            store: StateStore::new(dir),
            processes: ProcessTable::new(dir),
        }
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/api/health", get(api::health))
        .route("/api/providers", get(api::list_providers))
        .route("/api/state", get(api::get_state))
        .route("/api/switch", post(api::switch))
        .route("/api/processes", get(api::list_processes))
        .route("/api/export-env", get(api::export_env))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the settings server. `host` may be a hostname or an IP literal.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind settings server to {host}:{port}"))
}

/// Serve on an already bound listener until the process is stopped.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, state: Arc<GatewayState>) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Settings server listener has no local address")?;
    info!(addr = %addr, "Settings server listening");
    axum::serve(listener, build_router(state))
        .await
        .context("Settings server failed")?;
    Ok(())
}
