//! Entity to DTO mappers

use chat_core::entities::Message;

use super::responses::{AuthorResponse, MessageResponse};

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            uuid: message.uuid,
            content: message.content.clone(),
            timestamp: message.timestamp(),
            author: AuthorResponse {
                name: message.author.name.clone(),
            },
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}
