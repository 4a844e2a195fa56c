//! Message service
//!
//! Handles message creation, editing, deletion, and history queries.
//! Writes are persisted first and only then published to live subscribers.

use chat_core::entities::{ChatMessage, NewMessage};
use chat_core::traits::HistoryQuery;
use chat_core::{DomainError, Message, RoomId, UserId};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateMessageRequest, HistoryParams, MessageResponse, UpdateMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message to a room
    #[instrument(skip(self, request), fields(room = %room_id, author = %author_id))]
    pub async fn create_message(
        &self,
        room_id: RoomId,
        author_id: UserId,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        let message = self
            .ctx
            .message_repo()
            .create(&NewMessage::new(room_id, author_id, request.content))
            .await?;

        info!(message_uuid = %message.uuid, "Message created");

        let response = MessageResponse::from(&message);
        self.publish(ChatMessage::created(message));
        Ok(response)
    }

    /// Edit a message; only its author may do so
    #[instrument(skip(self, request), fields(room = %room_id, user = %user_id))]
    pub async fn update_message(
        &self,
        room_id: &RoomId,
        message_uuid: Uuid,
        user_id: UserId,
        request: UpdateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        self.find_owned(room_id, message_uuid, user_id).await?;

        let message = self
            .ctx
            .message_repo()
            .update_content(message_uuid, &request.content)
            .await?;

        info!(%message_uuid, "Message updated");

        let response = MessageResponse::from(&message);
        self.publish(ChatMessage::updated(message));
        Ok(response)
    }

    /// Delete a message; only its author may do so
    #[instrument(skip(self), fields(room = %room_id, user = %user_id))]
    pub async fn delete_message(
        &self,
        room_id: &RoomId,
        message_uuid: Uuid,
        user_id: UserId,
    ) -> ServiceResult<()> {
        let message = self.find_owned(room_id, message_uuid, user_id).await?;

        self.ctx.message_repo().delete(message_uuid).await?;

        info!(%message_uuid, "Message deleted");

        self.publish(ChatMessage::deleted(message));
        Ok(())
    }

    /// One page of room history in chronological order
    ///
    /// The page holds the newest messages after skipping `offset`, oldest first.
    /// Messages sharing a timestamp are ordered by id.
    #[instrument(skip(self, params), fields(room = %room_id))]
    pub async fn list_messages(
        &self,
        room_id: &RoomId,
        params: HistoryParams,
    ) -> ServiceResult<Vec<MessageResponse>> {
        params.validate()?;

        if !self.ctx.message_repo().room_exists(room_id).await? {
            return Err(DomainError::RoomNotFound(room_id.clone()).into());
        }

        let query = HistoryQuery::new(params.offset, self.ctx.history_page_size());
        let mut messages = self.ctx.message_repo().find_recent(room_id, query).await?;

        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(messages.iter().map(MessageResponse::from).collect())
    }

    /// Check whether a room exists
    pub async fn room_exists(&self, room_id: &RoomId) -> ServiceResult<bool> {
        Ok(self.ctx.message_repo().room_exists(room_id).await?)
    }

    async fn find_owned(
        &self,
        room_id: &RoomId,
        message_uuid: Uuid,
        user_id: UserId,
    ) -> ServiceResult<Message> {
        let message = self
            .ctx
            .message_repo()
            .find_by_uuid(room_id, message_uuid)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_uuid.to_string()))?;

        if !message.is_authored_by(user_id) {
            return Err(DomainError::NotMessageAuthor.into());
        }

        Ok(message)
    }

    fn publish(&self, change: ChatMessage) {
        let delivered = self.ctx.publisher().publish(&change);
        debug!(
            room = %change.room_id(),
            kind = change.change.as_str(),
            delivered,
            "Message published"
        );
    }
}
