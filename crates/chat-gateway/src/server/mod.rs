//! Gateway server setup
//!
//! Routes, state construction and the serve loop.

mod handler;
mod messages;
mod middleware;
mod state;

pub use handler::{stream_handler, STREAM_METHOD};
pub use middleware::{apply_middleware, create_cors_layer, REQUEST_ID_HEADER};
pub use state::GatewayState;

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch},
    Json, Router,
};
use chat_common::{AppConfig, AppError, StorageBackend};
use chat_db::{
    seed_demo, InMemoryMessageRepository, InMemorySessionStore, PgMessageRepository,
    PgSessionRepository,
};
use chat_service::dto::HealthResponse;
use tokio::net::TcpListener;

use crate::auth::require_session;

/// Create the gateway router
///
/// Message routes sit behind [`require_session`]; the stream route gates
/// inside its handler so it can refuse before upgrading.
pub fn create_router(state: &GatewayState) -> Router<GatewayState> {
    let protected = Router::new()
        .route(
            "/rooms/:room_id/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/rooms/:room_id/messages/:message_uuid",
            patch(messages::update_message).delete(messages::delete_message),
        )
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/rooms/:room_id/stream", get(stream_handler))
        .route("/health", get(health_check))
        .merge(protected)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let config = state.config();
    apply_middleware(
        create_router(&state),
        &config.cors,
        config.app.env.is_production(),
    )
    .with_state(state)
}

/// Initialize the configured storage backend and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    match config.storage {
        StorageBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

            tracing::info!("Connecting to PostgreSQL...");
            let pool = chat_db::create_pool(&chat_db::DatabaseConfig::from(db))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            chat_db::run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
            tracing::info!("PostgreSQL connection established");

            let sessions = Arc::new(PgSessionRepository::new(pool.clone()));
            let messages = Arc::new(PgMessageRepository::new(pool));
            Ok(GatewayState::new(config, sessions, messages))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");

            let sessions = Arc::new(InMemorySessionStore::new());
            let messages = Arc::new(InMemoryMessageRepository::new());
            let seed = seed_demo(&sessions, &messages)?;

            for (user_id, name, token) in &seed.users {
                tracing::info!(room = %seed.room, user = %user_id, name = %name, token = %token, "Demo session");
            }

            Ok(GatewayState::new(config, sessions, messages))
        }
    }
}

/// Serve on an already bound listener until `signal` resolves
///
/// Open streams are told to end as soon as the signal fires.
pub async fn serve<F>(listener: TcpListener, state: GatewayState, signal: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("Shutting down, closing open streams");
            state.begin_shutdown();
        })
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    let state = create_gateway_state(config).await?;

    tracing::info!("Starting Gateway server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on http://{}", addr);
    serve(listener, state, ctrl_c()).await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
