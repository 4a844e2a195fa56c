//! Database models - SQLx-compatible structs for PostgreSQL tables

mod message;
mod session;

pub use message::MessageModel;
pub use session::SessionModel;
