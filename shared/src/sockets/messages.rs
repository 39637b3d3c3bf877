use serde::{Deserialize, Serialize};

/// Incoming WebSocket message from an admin session
#[derive(Debug, Deserialize)]
pub struct WebSocketMessage {
    pub action: String,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// WebSocket action types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebSocketAction {
    // Live mirror lifecycle
    Subscribe,
    Unsubscribe,

    // Keepalive
    Ping,
}

/// Broadcast message pushed to every registered connection
#[derive(Debug, Serialize)]
pub struct BroadcastMessage {
    pub r#type: String,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl BroadcastMessage {
    pub fn new(message_type: &str, data: serde_json::Value) -> Self {
        Self {
            r#type: message_type.to_string(),
            data,
        }
    }
}
