//! REST API server for Nightfall.
//!
//! Provides HTTP endpoints for:
//! - Operation control (start, stop, status, health)
//! - Message ingestion from the meeting client
//! - Live event stream for dashboards (SSE)
//! - Demo simulation
//! - Agent profile listing

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::launcher::Launcher;
use crate::operation::OperationStore;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// State shared by every route.
#[derive(Clone)]
pub struct ApiState {
    pub store: OperationStore,
    pub launcher: Arc<dyn Launcher>,
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(store: OperationStore, launcher: Arc<dyn Launcher>, config: Config) -> Self {
        Self {
            store,
            launcher,
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with CORS open to any origin.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::operation::router(state.clone()))
        .merge(routes::messages::router(state.clone()))
        .merge(routes::events::router(state.clone()))
        .merge(routes::demo::router(state.clone()))
        .merge(routes::agents::router(state))
        .layer(ServiceBuilder::new().layer(cors))
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: ApiState,
}

impl ApiServer {
    pub fn new(host: impl Into<String>, port: u16, state: ApiState) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /health        - Liveness and operation flag");
        info!("  POST /start         - Start an operation");
        info!("  POST /stop          - Stop the current operation");
        info!("  GET  /status        - Full operation snapshot");
        info!("  POST /message       - Ingest a conversation message");
        info!("  GET  /stream        - Live event stream (SSE)");
        info!("  POST /demo/start    - Start the scripted demo");
        info!("  GET  /agents        - List agent profiles");

        axum::serve(listener, app).await?;

        Ok(())
    }
}
