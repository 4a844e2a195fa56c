//! In-memory storage
//!
//! Process-local implementations of the collaborator traits. Used by the
//! `memory` storage backend and by tests across the workspace.

mod message;
mod seed;
mod session;

pub use message::InMemoryMessageRepository;
pub use seed::{seed_demo, DemoSeed};
pub use session::InMemorySessionStore;
