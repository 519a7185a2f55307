//! Per-subscriber event stream over the operation record.
//!
//! Each subscriber polls the store on a fixed interval and receives:
//! - a `message` event for every message appended since its last tick (backlog first)
//! - one `password_found` event once a secret is recorded, which ends the loop
//! - a final `complete` event, whatever ended the loop

use crate::operation::OperationStore;
use futures::Stream;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Message { sender: String, content: String },
    PasswordFound { password: String },
    Complete,
}

/// Follows the operation that is current when the stream is first polled.
///
/// The loop ends when that operation goes inactive, when a newer operation
/// replaces it, or right after the secret is emitted.
pub fn subscribe(store: OperationStore, poll_interval: Duration) -> impl Stream<Item = StreamEvent> {
    async_stream::stream! {
        let mut cursor = 0;
        let mut bound_generation = None;

        loop {
            let poll = store.poll(cursor).await;
            let generation = *bound_generation.get_or_insert(poll.generation);
            if !poll.active || poll.generation != generation {
                break;
            }

            for message in poll.new_messages {
                yield StreamEvent::Message {
                    sender: message.sender,
                    content: message.content,
                };
            }
            cursor = poll.cursor;

            if let Some(password) = poll.discovered_secret {
                yield StreamEvent::PasswordFound { password };
                break;
            }

            tokio::time::sleep(poll_interval).await;
        }

        debug!("Stream subscriber finished after {} messages", cursor);
        yield StreamEvent::Complete;
    }
}
