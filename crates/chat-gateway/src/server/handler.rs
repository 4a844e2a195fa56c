//! Room stream handler
//!
//! Authenticates the upgrade request, then runs one [`StreamSession`] per socket.

use axum::{
    extract::{ws::{rejection::WebSocketUpgradeRejection, WebSocket}, State, WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use chat_core::{DomainError, RoomId};
use chat_service::MessageService;
use futures::StreamExt;

use super::GatewayState;
use crate::auth::{AuthenticatedStream, StreamHandshake};
use crate::extractors::RoomPath;
use crate::protocol::CloseCode;
use crate::response::{ApiError, ApiResult};
use crate::stream::{client_gone, EventSink, StreamError, StreamSession, WsEventSink};

/// Method name logged for stream calls
pub const STREAM_METHOD: &str = "GET /rooms/:room_id/stream";

/// Room stream handler
///
/// Refuses the upgrade with 401 before touching the registry when the caller
/// has no valid session.
pub async fn stream_handler(
    State(state): State<GatewayState>,
    room: Result<RoomPath, ApiError>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> ApiResult<Response> {
    let handshake = StreamHandshake::new(STREAM_METHOD, Some(headers), ws);
    let authenticated = state.gate().admit(handshake).await?;
    let RoomPath(room_id) = room?;
    let authenticated = authenticated
        .try_map(|ws| ws.map_err(|e| ApiError::upgrade_required(e.body_text())))?;

    if !MessageService::new(state.service_context())
        .room_exists(&room_id)
        .await?
    {
        return Err(DomainError::RoomNotFound(room_id).into());
    }

    let (upgrade, context) = authenticated.into_parts();
    Ok(upgrade.on_upgrade(move |socket| {
        handle_socket(state, room_id, AuthenticatedStream::new(socket, context))
    }))
}

/// Drive one upgraded socket until the client leaves, the server stops, or delivery fails
async fn handle_socket(state: GatewayState, room_id: RoomId, socket: AuthenticatedStream<WebSocket>) {
    let (socket, context) = socket.into_parts();
    let user_id = context.user_id();
    let (sender, receiver) = socket.split();
    let mut sink = AuthenticatedStream::new(WsEventSink::new(sender), context);

    tracing::info!(room = %room_id, user = %user_id, "Stream opened");

    let shutdown = state.shutdown_signal();
    let cancelled = async move {
        tokio::select! {
            () = client_gone(receiver) => {}
            () = shutdown => {}
        }
    };

    let mut session = StreamSession::new(state.registry().clone(), room_id.clone());
    let close_code = match session.run(&mut sink, cancelled).await {
        Ok(()) => None,
        Err(StreamError::Evicted) => Some(CloseCode::SlowConsumer),
        Err(StreamError::Transport(_)) => None,
        Err(StreamError::AlreadyStarted) => Some(CloseCode::UnknownError),
    };

    // A shutdown-triggered cancel still owes the client a close frame
    let close_code = close_code.or_else(|| {
        state
            .is_shutting_down()
            .then_some(CloseCode::ServerShutdown)
    });

    if let Some(code) = close_code {
        if let Err(e) = sink.close(code).await {
            tracing::debug!(room = %room_id, user = %user_id, error = %e, "Close frame not delivered");
        }
    }

    tracing::info!(room = %room_id, user = %user_id, "Stream closed");
}
