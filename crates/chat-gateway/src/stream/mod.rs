//! Per-client streaming
//!
//! A [`StreamSession`] owns one room subscription for the lifetime of one
//! client stream and forwards every event it receives to an [`EventSink`].

mod session;
mod sink;

pub use session::{SessionState, StreamError, StreamSession};
pub use sink::{client_gone, EventSink, SinkError, WsEventSink};
