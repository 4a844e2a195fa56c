//! Stream session lifecycle

use std::future::Future;

use chat_core::RoomId;

use super::sink::{EventSink, SinkError};
use crate::registry::RoomChannelRegistry;

/// Lifecycle of one stream session
///
/// `Idle -> Subscribed -> Draining -> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Subscribed,
    Draining,
    Closed,
}

/// Why a stream session ended abnormally
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Subscriber fell behind and was disconnected")]
    Evicted,

    #[error(transparent)]
    Transport(#[from] SinkError),

    #[error("Stream session already started")]
    AlreadyStarted,
}

/// Forwards one room's events to one client
#[derive(Debug)]
pub struct StreamSession {
    registry: RoomChannelRegistry,
    room: RoomId,
    state: SessionState,
}

impl StreamSession {
    pub fn new(registry: RoomChannelRegistry, room: RoomId) -> Self {
        Self {
            registry,
            room,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Subscribe to the room and forward events until `cancelled` resolves
    ///
    /// Cancellation ends the session with `Ok`. Eviction and send failures are
    /// returned as errors. The subscription is released exactly once on every
    /// exit path, including the future being dropped.
    pub async fn run<S, F>(&mut self, sink: &mut S, cancelled: F) -> Result<(), StreamError>
    where
        S: EventSink,
        F: Future<Output = ()>,
    {
        if self.state != SessionState::Idle {
            return Err(StreamError::AlreadyStarted);
        }

        let mut subscriber = self.registry.subscribe(&self.room);
        self.state = SessionState::Subscribed;
        tracing::debug!(room = %self.room, subscriber = %subscriber.id(), "Stream subscribed");

        tokio::pin!(cancelled);

        let outcome = loop {
            tokio::select! {
                biased;

                () = &mut cancelled => break Ok(()),

                event = subscriber.recv() => {
                    let Some(event) = event else {
                        break Err(StreamError::Evicted);
                    };

                    tokio::select! {
                        biased;

                        () = &mut cancelled => break Ok(()),

                        sent = sink.send_event(&event) => {
                            if let Err(e) = sent {
                                break Err(StreamError::Transport(e));
                            }
                        }
                    }
                }
            }
        };

        self.state = SessionState::Draining;
        let subscriber_id = subscriber.id();
        if !subscriber.close() {
            tracing::debug!(room = %self.room, subscriber = %subscriber_id, "Subscriber was already removed");
        }
        self.state = SessionState::Closed;

        match &outcome {
            Ok(()) => tracing::debug!(room = %self.room, subscriber = %subscriber_id, "Stream cancelled"),
            Err(e) => tracing::info!(room = %self.room, subscriber = %subscriber_id, reason = %e, "Stream ended"),
        }

        outcome
    }
}
