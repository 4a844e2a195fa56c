//! Stream protocol definitions
//!
//! Payloads pushed to streaming clients and the close codes used to end a stream.

mod close_codes;
mod event;

pub use close_codes::CloseCode;
pub use event::StreamEvent;
