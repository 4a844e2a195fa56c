//! Integration test utilities for the chat server
//!
//! Spawns the gateway on an ephemeral port with in-memory storage and drives
//! it over real HTTP and WebSocket connections.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
