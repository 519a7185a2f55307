//! Operation control endpoints.
//!
//! Provides HTTP endpoints for:
//! - Liveness (GET /health)
//! - Starting an operation (POST /start)
//! - Stopping the operation (POST /stop)
//! - Inspecting the operation record (GET /status)

use crate::api::error::{ApiError, ApiResult};
use crate::api::ApiState;
use crate::launcher::LaunchPlan;
use crate::operation::OperationState;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

/// Request body for POST /start.
///
/// The snake_case aliases keep older dashboard builds working.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    #[serde(rename = "targetLink", alias = "meet_link")]
    pub target_link: String,
    /// Third-party URL to notify. Absent means the configured default; empty disables it.
    #[serde(default, rename = "targetNotifyURL", alias = "target_url")]
    pub target_notify_url: Option<String>,
    #[serde(default, rename = "agentId", alias = "agent_id")]
    pub agent_id: Option<String>,
}

impl StartRequest {
    fn notify_url(&self, default_url: Option<&str>) -> Option<String> {
        match self.target_notify_url.as_deref() {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url.to_string()),
            None => default_url
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/start", post(start_operation))
        .route("/stop", post(stop_operation))
        .route("/status", get(operation_status))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "operationActive": state.store.is_active().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Starts an operation: recreates the container service, launches the
/// meeting client and optionally notifies the third-party endpoint.
///
/// # Response
/// 400 when an operation is already active, 500 when the launch fails
/// (the active flag is reverted in that case).
async fn start_operation(
    State(state): State<ApiState>,
    Json(req): Json<StartRequest>,
) -> ApiResult<Json<Value>> {
    if req.target_link.trim().is_empty() {
        return Err(ApiError::bad_request("targetLink must not be empty"));
    }

    let (agent_id, agent) = state
        .config
        .agents
        .resolve(req.agent_id.as_deref())
        .ok_or_else(|| ApiError::internal("No agent profiles configured"))?;

    let started = state.store.start_if_idle(req.target_link.clone()).await?;

    let plan = LaunchPlan {
        target_link: req.target_link.clone(),
        agent_id: agent_id.to_string(),
        agent: agent.clone(),
        notify_url: req.notify_url(state.config.notify.default_url.as_deref()),
    };

    if let Err(e) = state.launcher.launch(&plan).await {
        error!("Launch failed for {}: {}", plan.target_link, e);
        state.store.abort(started.generation).await;
        return Err(e.into());
    }

    info!("Operation {} deployed", started.generation);

    Ok(Json(json!({
        "status": "started",
        "targetLink": req.target_link,
        "startedAt": started.started_at,
        "message": "CEO Agent deployed successfully",
    })))
}

async fn stop_operation(State(state): State<ApiState>) -> Json<Value> {
    info!("Stop command received via API");
    state.store.stop().await;
    Json(json!({
        "status": "stopped",
        "message": "Operation terminated",
    }))
}

async fn operation_status(State(state): State<ApiState>) -> Json<OperationState> {
    Json(state.store.snapshot().await)
}
