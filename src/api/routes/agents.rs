//! Agent profile listing (GET /agents).

use crate::api::ApiState;
use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/agents", get(list_agents))
        .with_state(state)
}

async fn list_agents(State(state): State<ApiState>) -> Json<Value> {
    let agents = &state.config.agents;
    let entries: Vec<Value> = agents
        .profiles
        .iter()
        .map(|(id, profile)| {
            json!({
                "id": id,
                "name": profile.name,
                "botName": profile.bot_name,
                "promptFile": profile.prompt_file,
            })
        })
        .collect();

    Json(json!({
        "agents": entries,
        "defaultAgent": agents.default_agent,
    }))
}
