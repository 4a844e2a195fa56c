//! Error handling utilities for repositories

use chat_core::error::DomainError;
use chat_core::value_objects::RoomId;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "room not found" error
pub fn room_not_found(id: &RoomId) -> DomainError {
    DomainError::RoomNotFound(id.clone())
}

/// Create a "message not found" error
pub fn message_not_found(uuid: Uuid) -> DomainError {
    DomainError::MessageNotFound(uuid)
}
