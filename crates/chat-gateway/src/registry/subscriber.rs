//! Subscriber handle

use std::fmt;
use std::sync::Arc;

use chat_core::RoomId;
use tokio::sync::mpsc;

use super::RoomChannelRegistry;
use crate::protocol::StreamEvent;

/// Registry-unique subscriber identifier
///
/// Never reused for the lifetime of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(super) const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of one room subscription
///
/// Deregisters itself exactly once, either through [`Subscriber::close`] or
/// when dropped.
pub struct Subscriber {
    registry: RoomChannelRegistry,
    room: RoomId,
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<StreamEvent>>,
    released: bool,
}

impl Subscriber {
    pub(super) fn new(
        registry: RoomChannelRegistry,
        room: RoomId,
        id: SubscriberId,
        receiver: mpsc::Receiver<Arc<StreamEvent>>,
    ) -> Self {
        Self {
            registry,
            room,
            id,
            receiver,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the subscriber has been removed from its room
    /// (evicted or closed) and its buffer is drained.
    pub async fn recv(&mut self) -> Option<Arc<StreamEvent>> {
        self.receiver.recv().await
    }

    /// Take a buffered event without waiting
    pub fn try_recv(&mut self) -> Option<Arc<StreamEvent>> {
        self.receiver.try_recv().ok()
    }

    /// Check whether the registry has dropped this subscriber and nothing is buffered
    pub fn is_disconnected(&self) -> bool {
        self.receiver.is_closed() && self.receiver.is_empty()
    }

    /// Deregister and close the channel
    ///
    /// Returns whether the subscriber was still registered.
    pub fn close(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        // Deregister first so no broadcast can target a closed channel.
        let removed = self.registry.unsubscribe(&self.room, self.id);
        self.receiver.close();
        removed
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        if !self.released {
            self.release();
        }
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("room", &self.room)
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
