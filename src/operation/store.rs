//! Shared handle over the single operation record.

use super::secret::SecretFilter;
use super::state::{IncomingMessage, Message, OperationState};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Operation already in progress")]
    AlreadyActive,
}

/// What happened to a message handed to [`OperationStore::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Appended to the current operation.
    Recorded,
    /// Appended, and its content became the discovered secret.
    SecretDiscovered,
    /// No active operation for this generation; nothing was stored.
    Dropped,
}

/// Everything a stream subscriber needs from one tick, read under a single lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub active: bool,
    pub generation: u64,
    pub new_messages: Vec<Message>,
    pub cursor: usize,
    pub discovered_secret: Option<String>,
}

struct Inner {
    state: OperationState,
    next_generation: u64,
}

/// Thread-safe handle for sharing the operation record between handlers and background tasks.
#[derive(Clone)]
pub struct OperationStore {
    inner: Arc<Mutex<Inner>>,
    filter: Arc<SecretFilter>,
}

impl Default for OperationStore {
    fn default() -> Self {
        Self::new(SecretFilter::default())
    }
}

impl OperationStore {
    pub fn new(filter: SecretFilter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: OperationState::default(),
                next_generation: 1,
            })),
            filter: Arc::new(filter),
        }
    }

    pub async fn snapshot(&self) -> OperationState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.state.active
    }

    /// Replaces the whole record with a fresh active operation, whatever was there before.
    pub async fn reset(&self, target_link: impl Into<String>) -> OperationState {
        let mut inner = self.inner.lock().await;
        Self::reset_locked(&mut inner, target_link.into())
    }

    /// Starts a new operation unless one is already active.
    pub async fn start_if_idle(
        &self,
        target_link: impl Into<String>,
    ) -> Result<OperationState, OperationError> {
        let mut inner = self.inner.lock().await;
        if inner.state.active {
            return Err(OperationError::AlreadyActive);
        }
        Ok(Self::reset_locked(&mut inner, target_link.into()))
    }

    /// Clears the active flag. History and secret are kept.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state.active {
            info!(
                "Stopping operation {} ({} messages)",
                inner.state.generation,
                inner.state.messages.len()
            );
        }
        inner.state.active = false;
    }

    /// Reverts the active flag after a failed launch, unless a newer operation took over.
    pub async fn abort(&self, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.state.generation == generation {
            inner.state.active = false;
        }
    }

    /// Appends a message to the active operation using the store's keyword filter.
    pub async fn ingest(&self, message: IncomingMessage) -> IngestOutcome {
        let mut inner = self.inner.lock().await;
        let generation = inner.state.generation;
        Self::append_locked(&mut inner, generation, message, &self.filter)
    }

    /// Appends on behalf of a background writer bound to `generation`, with its own filter.
    pub async fn ingest_for(
        &self,
        generation: u64,
        message: IncomingMessage,
        filter: &SecretFilter,
    ) -> IngestOutcome {
        let mut inner = self.inner.lock().await;
        Self::append_locked(&mut inner, generation, message, filter)
    }

    /// Returns messages past `cursor` plus the flags a subscriber loop checks.
    pub async fn poll(&self, cursor: usize) -> PollResult {
        let inner = self.inner.lock().await;
        let state = &inner.state;
        let start = cursor.min(state.messages.len());
        PollResult {
            active: state.active,
            generation: state.generation,
            new_messages: state.messages[start..].to_vec(),
            cursor: state.messages.len(),
            discovered_secret: state.discovered_secret.clone(),
        }
    }

    fn reset_locked(inner: &mut Inner, target_link: String) -> OperationState {
        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.state = OperationState::started(target_link, generation);
        info!(
            "Operation {} started for {}",
            generation,
            inner.state.target_link.as_deref().unwrap_or_default()
        );
        inner.state.clone()
    }

    fn append_locked(
        inner: &mut Inner,
        generation: u64,
        message: IncomingMessage,
        filter: &SecretFilter,
    ) -> IngestOutcome {
        let state = &mut inner.state;
        if !state.active || state.generation != generation {
            debug!(
                "Dropping message from {}: no active operation",
                message.sender
            );
            return IngestOutcome::Dropped;
        }

        let message = message.into_message();
        debug!("Message from {}: {}", message.sender, message.content);

        let outcome = if state.discovered_secret.is_none() && filter.matches(&message.content) {
            info!("Secret discovered in message from {}", message.sender);
            state.discovered_secret = Some(message.content.clone());
            IngestOutcome::SecretDiscovered
        } else {
            IngestOutcome::Recorded
        };

        state.messages.push(message);
        outcome
    }
}
