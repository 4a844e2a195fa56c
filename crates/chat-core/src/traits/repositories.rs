//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Message, NewMessage};
use crate::error::DomainError;
use crate::value_objects::{RoomId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Session Validator
// ============================================================================

/// Resolves an opaque session token to the user it belongs to
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a session token
    ///
    /// Returns `SessionNotFound` for unknown tokens, `SessionExpired` for
    /// expired ones. Any other error means the lookup itself failed.
    async fn validate_session(&self, token: &str) -> RepoResult<UserId>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination window for room history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Number of newest messages to skip
    pub offset: i64,
    /// Maximum number of messages to return
    pub limit: i64,
}

impl HistoryQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: offset.max(0),
            limit: limit.max(1),
        }
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message, returning it with author and timestamps filled in
    ///
    /// Fails with `RoomNotFound` if the room does not exist.
    async fn create(&self, message: &NewMessage) -> RepoResult<Message>;

    /// Find a message in a room by its public UUID
    async fn find_by_uuid(&self, room_id: &RoomId, uuid: Uuid) -> RepoResult<Option<Message>>;

    /// Replace message content and bump its update timestamp
    async fn update_content(&self, uuid: Uuid, content: &str) -> RepoResult<Message>;

    /// Delete a message
    async fn delete(&self, uuid: Uuid) -> RepoResult<()>;

    /// Newest messages of a room, newest first
    async fn find_recent(&self, room_id: &RoomId, query: HistoryQuery) -> RepoResult<Vec<Message>>;

    /// Check whether a room with this id exists
    async fn room_exists(&self, room_id: &RoomId) -> RepoResult<bool>;
}
