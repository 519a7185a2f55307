//! API route modules.

pub mod agents;
pub mod demo;
pub mod events;
pub mod messages;
pub mod operation;
