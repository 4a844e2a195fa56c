//! Service context - dependency container for services

use std::sync::Arc;

use chat_core::traits::{MessagePublisher, MessageRepository};

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency is shared.
#[derive(Clone)]
pub struct ServiceContext {
    message_repo: Arc<dyn MessageRepository>,
    publisher: Arc<dyn MessagePublisher>,
    history_page_size: i64,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        publisher: Arc<dyn MessagePublisher>,
        history_page_size: i64,
    ) -> Self {
        Self {
            message_repo,
            publisher,
            history_page_size,
        }
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the publisher used for live fan-out
    pub fn publisher(&self) -> &dyn MessagePublisher {
        self.publisher.as_ref()
    }

    /// Messages per history page
    pub fn history_page_size(&self) -> i64 {
        self.history_page_size
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("message_repo", &"...")
            .field("publisher", &"...")
            .field("history_page_size", &self.history_page_size)
            .finish()
    }
}
