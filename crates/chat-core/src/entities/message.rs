//! Message entity - a chat message posted to a room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{RoomId, UserId};

/// Author of a message as shown to other room members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
}

/// Message entity, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Storage-assigned numeric id
    pub id: i64,
    /// Public identifier used by edit/delete calls
    pub uuid: Uuid,
    pub room_id: RoomId,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Maximum content length in characters
    pub const MAX_CONTENT_LEN: usize = 2000;

    /// Check whether `user` wrote this message
    #[inline]
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author.id == user
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Timestamp clients see; edits keep the original posting time
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Data required to persist a new message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub uuid: Uuid,
    pub room_id: RoomId,
    pub author_id: UserId,
    pub content: String,
}

impl NewMessage {
    /// Create a new message with a fresh UUID
    pub fn new(room_id: RoomId, author_id: UserId, content: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            room_id,
            author_id,
            content,
        }
    }
}

/// What happened to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "send")]
    Created,
    #[serde(rename = "update")]
    Updated,
    #[serde(rename = "delete")]
    Deleted,
}

impl ChangeKind {
    /// Wire name of the change
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "send",
            Self::Updated => "update",
            Self::Deleted => "delete",
        }
    }
}

/// A message change ready for fan-out
///
/// Built once the change has been persisted and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub change: ChangeKind,
    pub message: Message,
}

impl ChatMessage {
    pub fn created(message: Message) -> Self {
        Self {
            change: ChangeKind::Created,
            message,
        }
    }

    pub fn updated(message: Message) -> Self {
        Self {
            change: ChangeKind::Updated,
            message,
        }
    }

    pub fn deleted(message: Message) -> Self {
        Self {
            change: ChangeKind::Deleted,
            message,
        }
    }

    /// Room the change belongs to
    #[inline]
    pub fn room_id(&self) -> &RoomId {
        &self.message.room_id
    }
}
