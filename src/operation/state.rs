//! Operation record and message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One conversation line. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
    pub timestamp: String,
}

/// Message body accepted by the ingestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl IncomingMessage {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: None,
        }
    }

    /// Fills in the current time when the sender did not provide a timestamp.
    pub fn into_message(self) -> Message {
        let timestamp = self
            .timestamp
            .filter(|ts| !ts.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        Message {
            sender: self.sender,
            content: self.content,
            timestamp,
        }
    }
}

/// State of the current (or last) operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationState {
    pub active: bool,
    pub target_link: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub messages: Vec<Message>,
    pub discovered_secret: Option<String>,
    #[serde(skip)]
    pub generation: u64,
}

impl OperationState {
    pub(crate) fn started(target_link: String, generation: u64) -> Self {
        Self {
            active: true,
            target_link: Some(target_link),
            started_at: Some(Utc::now()),
            messages: Vec::new(),
            discovered_secret: None,
            generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_message_keeps_timestamp() {
        let incoming = IncomingMessage {
            sender: "BOT".to_string(),
            content: "hi".to_string(),
            timestamp: Some("2026-01-01T00:00:00Z".to_string()),
        };
        let message = incoming.into_message();
        assert_eq!(message.timestamp, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_into_message_defaults_timestamp() {
        let message = IncomingMessage::new("BOT", "hi").into_message();
        assert!(DateTime::parse_from_rfc3339(&message.timestamp).is_ok());
    }

    #[test]
    fn test_empty_timestamp_is_replaced() {
        let incoming: IncomingMessage =
            serde_json::from_str(r#"{"sender":"A","content":"b","timestamp":""}"#).unwrap();
        let message = incoming.into_message();
        assert!(!message.timestamp.is_empty());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = OperationState::started("https://meet.example/abc".to_string(), 3);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["active"], true);
        assert_eq!(json["targetLink"], "https://meet.example/abc");
        assert!(json["startedAt"].is_string());
        assert_eq!(json["messages"], serde_json::json!([]));
        assert!(json["discoveredSecret"].is_null());
        assert!(json.get("generation").is_none());
    }
}
