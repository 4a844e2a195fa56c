//! # chat-service
//!
//! Application layer containing the message use cases and their DTOs.
//! Every write is persisted before it is handed to the publisher.

pub mod dto;
pub mod services;

pub use services::{MessageService, ServiceContext, ServiceError, ServiceResult};
