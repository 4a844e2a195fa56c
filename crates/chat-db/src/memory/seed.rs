//! Demo data for the in-memory backend

use chrono::Duration;
use uuid::Uuid;

use chat_core::error::DomainError;
use chat_core::value_objects::{RoomId, UserId};

use super::{InMemoryMessageRepository, InMemorySessionStore};

/// Identifiers created by [`seed_demo`]
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub room: RoomId,
    /// `(user, display name, session token)` for each demo user
    pub users: Vec<(UserId, String, String)>,
}

/// Populate the in-memory stores with a room and two logged-in users
pub fn seed_demo(
    sessions: &InMemorySessionStore,
    messages: &InMemoryMessageRepository,
) -> Result<DemoSeed, DomainError> {
    let room = RoomId::parse("lobby")?;
    messages.add_room(room.clone());

    let users = [(1, "alice"), (2, "bob")]
        .into_iter()
        .map(|(id, name)| {
            let user = UserId::new(id);
            let token = Uuid::new_v4().simple().to_string();
            messages.add_user(user, name);
            sessions.insert_session(token.clone(), user, Duration::hours(24));
            (user, name.to_string(), token)
        })
        .collect();

    Ok(DemoSeed { room, users })
}
