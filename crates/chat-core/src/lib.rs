//! # chat-core
//!
//! Domain layer containing entities, value objects, and the collaborator traits
//! the realtime core depends on (session validation, message storage, publishing).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Author, ChangeKind, ChatMessage, Message, NewMessage, Session};
pub use error::DomainError;
pub use traits::{
    HistoryQuery, MessagePublisher, MessageRepository, RepoResult, SessionValidator,
};
pub use value_objects::{RoomId, RoomIdError, UserId};
