//! Outbound port for message fan-out

use crate::entities::ChatMessage;

/// Delivers a persisted message change to live subscribers of its room
///
/// Delivery is best-effort and runs on the caller; it must not block on
/// slow subscribers.
pub trait MessagePublisher: Send + Sync {
    /// Publish a change, returning how many subscribers accepted it
    fn publish(&self, message: &ChatMessage) -> usize;
}
