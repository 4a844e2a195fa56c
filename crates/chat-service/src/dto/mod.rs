//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs shared by the HTTP handlers and the stream payloads
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateMessageRequest, HistoryParams, UpdateMessageRequest};
pub use responses::{AuthorResponse, HealthResponse, MessageResponse};
