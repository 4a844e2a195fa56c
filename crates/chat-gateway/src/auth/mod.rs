//! Session gate
//!
//! Every protected entry point, unary or streaming, passes through the same
//! [`SessionGate::admit`] routine. Call shapes plug in through [`GatedCall`]:
//! how to read their metadata and how to attach the resolved identity.

mod gate;
mod stream;
mod unary;

pub use gate::{session_token, CallContext, GateError, GatedCall, SessionGate, SESSION_COOKIE};
pub use stream::{AuthenticatedStream, StreamHandshake};
pub use unary::{require_session, AuthUser};
