//! Demo simulation endpoint (POST /demo/start).

use crate::api::ApiState;
use crate::demo;
use axum::{extract::State, response::Json, routing::post, Router};
use serde_json::{json, Value};

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/demo/start", post(start_demo))
        .with_state(state)
}

/// Replaces any current operation with the scripted demo conversation.
async fn start_demo(State(state): State<ApiState>) -> Json<Value> {
    demo::start_demo(&state.store, &state.config.demo.target_link).await;
    Json(json!({ "status": "demo_started" }))
}
