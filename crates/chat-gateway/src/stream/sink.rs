//! Outbound side of a client stream

use std::borrow::Cow;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use crate::auth::AuthenticatedStream;
use crate::protocol::{CloseCode, StreamEvent};

/// Delivery failures
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Where a stream session pushes events
#[async_trait]
pub trait EventSink: Send {
    async fn send_event(&mut self, event: &StreamEvent) -> Result<(), SinkError>;

    /// End the stream with an application close code
    async fn close(&mut self, code: CloseCode) -> Result<(), SinkError>;
}

/// Write half of a WebSocket
pub struct WsEventSink {
    sink: SplitSink<WebSocket, Message>,
}

impl WsEventSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl EventSink for WsEventSink {
    async fn send_event(&mut self, event: &StreamEvent) -> Result<(), SinkError> {
        let json = event.to_json()?;
        self.sink
            .send(Message::Text(json))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), SinkError> {
        let frame = CloseFrame {
            code: code.as_u16(),
            reason: Cow::Borrowed(code.reason()),
        };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

#[async_trait]
impl<S: EventSink> EventSink for AuthenticatedStream<S> {
    async fn send_event(&mut self, event: &StreamEvent) -> Result<(), SinkError> {
        let user = self.context().user_id();
        self.get_mut()
            .send_event(event)
            .await
            .inspect_err(|e| tracing::debug!(user = %user, error = %e, "Event delivery failed"))
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), SinkError> {
        tracing::debug!(user = %self.context().user_id(), code = code.as_u16(), "Closing stream");
        self.get_mut().close(code).await
    }
}

/// Resolves once the client closes its side of the socket
///
/// Inbound frames carry nothing for a room stream and are discarded.
pub async fn client_gone(mut source: SplitStream<WebSocket>) {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Stream read failed");
                break;
            }
        }
    }
}
