//! Broadcaster
//!
//! Publisher used by the message service once a change is stored.

use std::sync::Arc;

use chat_core::{ChatMessage, MessagePublisher};

use crate::protocol::StreamEvent;
use crate::registry::RoomChannelRegistry;

/// Fans message changes out to the subscribers of their room
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: RoomChannelRegistry,
}

impl Broadcaster {
    pub fn new(registry: RoomChannelRegistry) -> Self {
        Self { registry }
    }

    /// Deliver a change to its room; returns how many subscribers accepted it
    pub fn broadcast(&self, change: &ChatMessage) -> usize {
        let event = Arc::new(StreamEvent::from(change));
        self.registry.broadcast(change.room_id(), &event)
    }

    pub fn registry(&self) -> &RoomChannelRegistry {
        &self.registry
    }
}

impl MessagePublisher for Broadcaster {
    fn publish(&self, message: &ChatMessage) -> usize {
        self.broadcast(message)
    }
}
