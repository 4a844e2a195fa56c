//! Repository implementations
//!
//! PostgreSQL implementations of the collaborator traits defined in chat-core.

mod error;
mod message;
mod session;

pub use message::PgMessageRepository;
pub use session::PgSessionRepository;
