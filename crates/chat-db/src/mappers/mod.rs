//! Model to entity mappers
//!
//! Conversions from database rows to `chat-core` entities. Rows carrying data
//! the domain rejects (e.g. a malformed room id) map to `DomainError`.

mod message;
mod session;
