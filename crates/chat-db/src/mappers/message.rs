//! MessageModel -> Message mapper

use chat_core::entities::{Author, Message};
use chat_core::error::DomainError;
use chat_core::value_objects::{RoomId, UserId};

use crate::models::MessageModel;

impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        Ok(Message {
            id: model.id,
            uuid: model.uuid,
            room_id: RoomId::parse(model.room_uuid)?,
            author: Author {
                id: UserId::new(model.user_id),
                name: model.author_name,
            },
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
