//! Operation state tracking.
//!
//! One operation runs at a time. Its record is owned by an [`OperationStore`]
//! handle that request handlers, the demo simulator and stream subscribers share.

pub mod secret;
pub mod state;
pub mod store;

pub use secret::SecretFilter;
pub use state::{IncomingMessage, Message, OperationState};
pub use store::{IngestOutcome, OperationError, OperationStore, PollResult};
