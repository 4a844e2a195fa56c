//! In-memory MessageRepository

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use chat_core::entities::{Author, Message, NewMessage};
use chat_core::error::DomainError;
use chat_core::traits::{HistoryQuery, MessageRepository, RepoResult};
use chat_core::value_objects::{RoomId, UserId};

#[derive(Debug, Default)]
struct Store {
    rooms: HashSet<RoomId>,
    users: HashMap<UserId, String>,
    messages: HashMap<Uuid, Message>,
    next_id: i64,
}

/// Rooms, user names and messages held in process memory
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    store: RwLock<Store>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a room available for posting
    pub fn add_room(&self, room_id: RoomId) {
        self.store.write().rooms.insert(room_id);
    }

    /// Register a display name for a user
    pub fn add_user(&self, user_id: UserId, name: impl Into<String>) {
        self.store.write().users.insert(user_id, name.into());
    }

    /// Number of live (non-deleted) messages
    pub fn message_count(&self) -> usize {
        self.store.read().messages.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &NewMessage) -> RepoResult<Message> {
        let mut store = self.store.write();

        if !store.rooms.contains(&message.room_id) {
            return Err(DomainError::RoomNotFound(message.room_id.clone()));
        }

        let name = store
            .users
            .get(&message.author_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::InternalError(format!("unknown user {}", message.author_id))
            })?;

        store.next_id += 1;
        let now = Utc::now();
        let created = Message {
            id: store.next_id,
            uuid: message.uuid,
            room_id: message.room_id.clone(),
            author: Author {
                id: message.author_id,
                name,
            },
            content: message.content.clone(),
            created_at: now,
            updated_at: now,
        };

        store.messages.insert(created.uuid, created.clone());
        Ok(created)
    }

    async fn find_by_uuid(&self, room_id: &RoomId, uuid: Uuid) -> RepoResult<Option<Message>> {
        Ok(self
            .store
            .read()
            .messages
            .get(&uuid)
            .filter(|m| &m.room_id == room_id)
            .cloned())
    }

    async fn update_content(&self, uuid: Uuid, content: &str) -> RepoResult<Message> {
        let mut store = self.store.write();
        let message = store
            .messages
            .get_mut(&uuid)
            .ok_or(DomainError::MessageNotFound(uuid))?;

        message.content = content.to_string();
        message.updated_at = Utc::now();
        Ok(message.clone())
    }

    async fn delete(&self, uuid: Uuid) -> RepoResult<()> {
        self.store
            .write()
            .messages
            .remove(&uuid)
            .map(|_| ())
            .ok_or(DomainError::MessageNotFound(uuid))
    }

    async fn find_recent(&self, room_id: &RoomId, query: HistoryQuery) -> RepoResult<Vec<Message>> {
        let store = self.store.read();
        let mut messages: Vec<Message> = store
            .messages
            .values()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect();

        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(messages
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .collect())
    }

    async fn room_exists(&self, room_id: &RoomId) -> RepoResult<bool> {
        Ok(self.store.read().rooms.contains(room_id))
    }
}
