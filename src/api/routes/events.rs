//! Live event stream (GET /stream) as Server-Sent Events.

use crate::api::ApiState;
use crate::stream::{self, StreamEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tracing::info;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/stream", get(stream_events))
        .with_state(state)
}

async fn stream_events(
    State(state): State<ApiState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Stream subscriber connected");

    let poll_interval = Duration::from_millis(state.config.stream.poll_interval_ms);
    let keep_alive = Duration::from_secs(state.config.stream.keep_alive_secs.max(1));

    let events = stream::subscribe(state.store.clone(), poll_interval)
        .map(|event| Ok::<_, Infallible>(to_sse_event(&event)));

    Sse::new(events).keep_alive(KeepAlive::new().interval(keep_alive))
}

fn to_sse_event(event: &StreamEvent) -> Event {
    Event::default()
        .json_data(event)
        .unwrap_or_else(|_| Event::default().data("{}"))
}
