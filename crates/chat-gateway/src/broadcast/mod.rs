//! Room fan-out
//!
//! Turns persisted message changes into stream events and hands them to the
//! room registry.

mod broadcaster;

pub use broadcaster::Broadcaster;
