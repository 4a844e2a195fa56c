//! Gateway state
//!
//! Application state shared by every handler.

use std::sync::Arc;

use chat_common::AppConfig;
use chat_core::{MessageRepository, SessionValidator};
use chat_service::ServiceContext;
use tokio::sync::watch;

use crate::auth::SessionGate;
use crate::broadcast::Broadcaster;
use crate::registry::RoomChannelRegistry;

/// Gateway application state
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct GatewayState {
    /// Room subscriptions for live streams
    registry: RoomChannelRegistry,
    /// Session gate for every protected entry point
    gate: SessionGate,
    /// Service context with the message repository and the broadcaster
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Flipped to `true` when the server starts shutting down
    shutdown: Arc<watch::Sender<bool>>,
}

impl GatewayState {
    /// Wire the realtime core around the given collaborators
    pub fn new(
        config: AppConfig,
        sessions: Arc<dyn SessionValidator>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        let registry = RoomChannelRegistry::new(config.realtime.subscriber_buffer);
        let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
        let service_context =
            ServiceContext::new(messages, broadcaster, config.realtime.history_page_size);
        let (shutdown, _) = watch::channel(false);

        Self {
            registry,
            gate: SessionGate::new(sessions),
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Get the room registry
    pub fn registry(&self) -> &RoomChannelRegistry {
        &self.registry
    }

    /// Get the session gate
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Ask every open stream to end
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once [`begin_shutdown`](Self::begin_shutdown) has been called
    pub fn shutdown_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown.subscribe();
        async move {
            // An Err means the sender is gone, which also ends the stream.
            let _ = rx.wait_for(|stopping| *stopping).await;
        }
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
