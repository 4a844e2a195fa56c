//! Per-room subscriber set

use std::collections::HashMap;

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::mpsc;

use super::SubscriberId;
use crate::protocol::StreamEvent;

pub(super) type EventSender = mpsc::Sender<std::sync::Arc<StreamEvent>>;

/// One incarnation of a room entry
///
/// Once retired it is unreachable from the registry table and never reused.
pub(super) struct RoomSlot {
    members: Mutex<RoomMembers>,
}

impl RoomSlot {
    pub(super) fn new() -> Self {
        Self {
            members: Mutex::new(RoomMembers::default()),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, RoomMembers> {
        self.members.lock()
    }
}

#[derive(Default)]
pub(super) struct RoomMembers {
    retired: bool,
    senders: HashMap<SubscriberId, EventSender>,
}

impl RoomMembers {
    pub(super) fn is_retired(&self) -> bool {
        self.retired
    }

    pub(super) fn retire(&mut self) {
        self.retired = true;
        self.senders.clear();
    }

    pub(super) fn insert(&mut self, id: SubscriberId, sender: EventSender) {
        self.senders.insert(id, sender);
    }

    pub(super) fn remove(&mut self, id: SubscriberId) -> bool {
        self.senders.remove(&id).is_some()
    }

    pub(super) fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&SubscriberId, &mut EventSender) -> bool,
    {
        self.senders.retain(f);
    }

    pub(super) fn len(&self) -> usize {
        self.senders.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
