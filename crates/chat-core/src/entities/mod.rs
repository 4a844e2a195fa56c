//! Domain entities - core business objects

mod message;
mod session;

pub use message::{Author, ChangeKind, ChatMessage, Message, NewMessage};
pub use session::Session;
