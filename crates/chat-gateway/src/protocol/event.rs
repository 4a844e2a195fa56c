//! Stream event payload

use chat_core::{ChangeKind, ChatMessage};
use chat_service::dto::MessageResponse;
use serde::{Deserialize, Serialize};

/// One change pushed to a room subscriber
///
/// ```json
/// {"kind": "send", "message": {"id": 1, "uuid": "...", "content": "hi", "timestamp": "...", "author": {"name": "alice"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub kind: ChangeKind,
    pub message: MessageResponse,
}

impl StreamEvent {
    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&ChatMessage> for StreamEvent {
    fn from(change: &ChatMessage) -> Self {
        Self {
            kind: change.change,
            message: MessageResponse::from(&change.message),
        }
    }
}
