//! # chat-gateway
//!
//! Realtime room delivery behind a session gate.
//!
//! - [`registry`]: per-room subscriber sets with bounded delivery buffers
//! - [`broadcast`]: fans persisted message changes out to a room
//! - [`auth`]: the session gate shared by request/response and streaming calls
//! - [`stream`]: the per-client stream session lifecycle
//! - [`server`]: HTTP routes, the WebSocket stream endpoint and the serve loop

pub mod auth;
pub mod broadcast;
pub mod extractors;
pub mod protocol;
pub mod registry;
pub mod response;
pub mod server;
pub mod stream;

pub use auth::{AuthenticatedStream, CallContext, GateError, GatedCall, SessionGate, StreamHandshake};
pub use broadcast::Broadcaster;
pub use protocol::{CloseCode, StreamEvent};
pub use registry::{RoomChannelRegistry, Subscriber, SubscriberId};
pub use server::{create_app, create_gateway_state, run, serve, GatewayState};
pub use stream::{EventSink, SessionState, StreamError, StreamSession};
