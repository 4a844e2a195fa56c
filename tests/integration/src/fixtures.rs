//! Test fixtures and data generators

use chat_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LOBBY: &str = "lobby";
pub const ROOM_42: &str = "room-42";

pub const ALICE: UserId = UserId::new(1);
pub const BOB: UserId = UserId::new(2);

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const EXPIRED_TOKEN: &str = "expired-token";

/// Body for creating or editing a message
#[derive(Debug, Serialize)]
pub struct ContentBody {
    pub content: String,
}

impl ContentBody {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Message as returned by the HTTP endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageBody {
    pub id: i64,
    pub uuid: Uuid,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub author: AuthorBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorBody {
    pub name: String,
}

/// Error envelope returned on failures
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
