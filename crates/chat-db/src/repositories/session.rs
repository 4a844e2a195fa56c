//! PostgreSQL implementation of SessionValidator

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Session;
use chat_core::error::DomainError;
use chat_core::traits::{RepoResult, SessionValidator};
use chat_core::value_objects::UserId;

use crate::models::SessionModel;

use super::error::map_db_error;

/// Looks sessions up in the `sessions` table
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a session by token, regardless of expiry
    #[instrument(skip_all)]
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<Session>> {
        let result = sqlx::query_as::<_, SessionModel>(
            r#"
            SELECT user_id, session_token, expires_at
            FROM sessions
            WHERE session_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Session::from))
    }
}

#[async_trait]
impl SessionValidator for PgSessionRepository {
    // The token is a credential; keep it out of spans.
    #[instrument(skip_all)]
    async fn validate_session(&self, token: &str) -> RepoResult<UserId> {
        let session = self
            .find_by_token(token)
            .await?
            .ok_or(DomainError::SessionNotFound)?;

        if session.is_expired_at(Utc::now()) {
            return Err(DomainError::SessionExpired);
        }

        Ok(session.user_id)
    }
}
