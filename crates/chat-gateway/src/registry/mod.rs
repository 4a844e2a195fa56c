//! Room channel registry
//!
//! Process-wide table of rooms to the bounded channels of the clients
//! currently streaming them. Every room has its own lock; rooms never contend
//! with each other.

mod room;
mod subscriber;

pub use subscriber::{Subscriber, SubscriberId};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chat_core::RoomId;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::protocol::StreamEvent;
use room::{RoomMembers, RoomSlot};

/// Capacity used when none is configured
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Registry of room subscribers
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct RoomChannelRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    rooms: DashMap<RoomId, Arc<RoomSlot>>,
    next_subscriber: AtomicU64,
    buffer: usize,
}

impl RoomChannelRegistry {
    /// Create a registry whose subscribers buffer up to `buffer` events
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                rooms: DashMap::new(),
                next_subscriber: AtomicU64::new(1),
                buffer: buffer.max(1),
            }),
        }
    }

    /// Register a new subscriber for `room`, creating the room entry if needed
    pub fn subscribe(&self, room: &RoomId) -> Subscriber {
        let id = SubscriberId::new(self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.inner.buffer);

        loop {
            // Clone the slot out so the shard lock is released before the room lock is taken.
            let slot = Arc::clone(
                self.inner
                    .rooms
                    .entry(room.clone())
                    .or_insert_with(|| Arc::new(RoomSlot::new()))
                    .value(),
            );

            let mut members = slot.lock();
            if members.is_retired() {
                // Lost a race with the last unsubscribe; the entry is already gone.
                continue;
            }
            members.insert(id, tx);
            let count = members.len();
            drop(members);

            tracing::debug!(room = %room, subscriber = %id, members = count, "Subscribed");
            return Subscriber::new(self.clone(), room.clone(), id, rx);
        }
    }

    /// Remove a subscriber from `room`
    ///
    /// Returns `false` when the subscriber was not registered there (already
    /// removed, evicted, or the room is gone). The room entry is dropped when
    /// its last subscriber leaves.
    pub fn unsubscribe(&self, room: &RoomId, id: SubscriberId) -> bool {
        let Some(slot) = self.slot(room) else {
            return false;
        };

        let mut members = slot.lock();
        if members.is_retired() {
            return false;
        }

        let removed = members.remove(id);
        if members.is_empty() {
            self.retire(room, &slot, &mut members);
        }

        if removed {
            tracing::debug!(room = %room, subscriber = %id, "Unsubscribed");
        }
        removed
    }

    /// Deliver `event` to every current subscriber of `room`
    ///
    /// Never waits on a subscriber. A subscriber whose buffer is full loses the
    /// event and is evicted; one whose receiver is gone is dropped. Returns the
    /// number of subscribers that accepted the event. Absent rooms are a no-op.
    pub fn broadcast(&self, room: &RoomId, event: &Arc<StreamEvent>) -> usize {
        let Some(slot) = self.slot(room) else {
            tracing::trace!(room = %room, "Broadcast to room without subscribers");
            return 0;
        };

        let mut members = slot.lock();
        if members.is_retired() {
            return 0;
        }

        let mut delivered = 0;
        members.retain(|id, sender| match sender.try_send(Arc::clone(event)) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    room = %room,
                    subscriber = %id,
                    "Subscriber buffer full, dropping event and disconnecting"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(room = %room, subscriber = %id, "Skipping closed subscriber");
                false
            }
        });

        if members.is_empty() {
            self.retire(room, &slot, &mut members);
        }

        delivered
    }

    /// Number of rooms that currently have subscribers
    pub fn room_count(&self) -> usize {
        self.inner.rooms.len()
    }

    /// Number of subscribers registered for `room`
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.slot(room).map_or(0, |slot| slot.lock().len())
    }

    /// Check whether `room` currently has an entry
    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.inner.rooms.contains_key(room)
    }

    fn slot(&self, room: &RoomId) -> Option<Arc<RoomSlot>> {
        self.inner.rooms.get(room).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the room entry. Caller holds the room lock and the set is empty.
    fn retire(&self, room: &RoomId, slot: &Arc<RoomSlot>, members: &mut RoomMembers) {
        members.retire();
        self.inner
            .rooms
            .remove_if(room, |_, current| Arc::ptr_eq(current, slot));

        tracing::debug!(room = %room, "Room entry removed");
    }
}

impl Default for RoomChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}

impl std::fmt::Debug for RoomChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomChannelRegistry")
            .field("rooms", &self.inner.rooms.len())
            .field("buffer", &self.inner.buffer)
            .finish()
    }
}
