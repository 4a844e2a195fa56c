//! Collaborator traits (ports) implemented by the infrastructure crates

mod publisher;
mod repositories;

pub use publisher::MessagePublisher;
pub use repositories::{HistoryQuery, MessageRepository, RepoResult, SessionValidator};
