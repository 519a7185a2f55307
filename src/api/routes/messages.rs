//! Message ingestion endpoint (POST /message).
//!
//! Called by the meeting client, or anything else feeding the conversation.

use crate::api::ApiState;
use crate::operation::{IncomingMessage, IngestOutcome};
use axum::{extract::State, response::Json, routing::post, Router};
use serde_json::{json, Value};
use tracing::debug;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/message", post(add_message))
        .with_state(state)
}

async fn add_message(
    State(state): State<ApiState>,
    Json(message): Json<IncomingMessage>,
) -> Json<Value> {
    if state.store.ingest(message).await == IngestOutcome::Dropped {
        debug!("Message received while no operation is active");
    }
    Json(json!({ "status": "received" }))
}
