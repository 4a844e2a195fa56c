//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use chat_core::RoomId;
use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

/// `/rooms/:room_id/...`
#[derive(Debug, Clone)]
pub struct RoomPath(pub RoomId);

#[derive(Deserialize)]
struct RawRoom {
    room_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RoomPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawRoom>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(Self(parse_room(raw.room_id)?))
    }
}

/// `/rooms/:room_id/messages/:message_uuid`
#[derive(Debug, Clone)]
pub struct MessagePath {
    pub room_id: RoomId,
    pub message_uuid: Uuid,
}

#[derive(Deserialize)]
struct RawMessage {
    room_id: String,
    message_uuid: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for MessagePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawMessage>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let message_uuid = raw
            .message_uuid
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid message_uuid format"))?;

        Ok(Self {
            room_id: parse_room(raw.room_id)?,
            message_uuid,
        })
    }
}

fn parse_room(raw: String) -> Result<RoomId, ApiError> {
    RoomId::parse(raw).map_err(|e| ApiError::invalid_path(e.to_string()))
}
