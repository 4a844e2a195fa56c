//! Message handlers
//!
//! Every route here sits behind the session gate.

use axum::{extract::State, Json};
use chat_service::dto::{CreateMessageRequest, HistoryParams, MessageResponse, UpdateMessageRequest};
use chat_service::MessageService;

use super::GatewayState;
use crate::auth::AuthUser;
use crate::extractors::{JsonBody, MessagePath, QueryParams, RoomPath};
use crate::response::{ApiResult, Created, NoContent};

/// Post a message to a room
///
/// POST /rooms/:room_id/messages
pub async fn create_message(
    State(state): State<GatewayState>,
    auth: AuthUser,
    RoomPath(room_id): RoomPath,
    JsonBody(request): JsonBody<CreateMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let message = MessageService::new(state.service_context())
        .create_message(room_id, auth.user_id, request)
        .await?;

    Ok(Created(Json(message)))
}

/// One page of room history
///
/// GET /rooms/:room_id/messages?offset=
pub async fn list_messages(
    State(state): State<GatewayState>,
    _auth: AuthUser,
    RoomPath(room_id): RoomPath,
    QueryParams(params): QueryParams<HistoryParams>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let messages = MessageService::new(state.service_context())
        .list_messages(&room_id, params)
        .await?;

    Ok(Json(messages))
}

/// Edit one of the caller's messages
///
/// PATCH /rooms/:room_id/messages/:message_uuid
pub async fn update_message(
    State(state): State<GatewayState>,
    auth: AuthUser,
    path: MessagePath,
    JsonBody(request): JsonBody<UpdateMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = MessageService::new(state.service_context())
        .update_message(&path.room_id, path.message_uuid, auth.user_id, request)
        .await?;

    Ok(Json(message))
}

/// Delete one of the caller's messages
///
/// DELETE /rooms/:room_id/messages/:message_uuid
pub async fn delete_message(
    State(state): State<GatewayState>,
    auth: AuthUser,
    path: MessagePath,
) -> ApiResult<NoContent> {
    MessageService::new(state.service_context())
        .delete_message(&path.room_id, path.message_uuid, auth.user_id)
        .await?;

    Ok(NoContent)
}
