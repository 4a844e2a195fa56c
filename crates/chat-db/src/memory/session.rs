//! In-memory SessionValidator

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;

use chat_core::entities::Session;
use chat_core::error::DomainError;
use chat_core::traits::{RepoResult, SessionValidator};
use chat_core::value_objects::UserId;

/// Session table keyed by token
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session that expires `ttl` from now
    pub fn insert_session(&self, token: impl Into<String>, user_id: UserId, ttl: Duration) {
        let token = token.into();
        self.sessions.insert(
            token.clone(),
            Session {
                token,
                user_id,
                expires_at: Utc::now() + ttl,
            },
        );
    }

    /// Remove a session, returning whether it existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionValidator for InMemorySessionStore {
    async fn validate_session(&self, token: &str) -> RepoResult<UserId> {
        let session = self
            .sessions
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::SessionNotFound)?;

        if session.is_expired_at(Utc::now()) {
            return Err(DomainError::SessionExpired);
        }

        Ok(session.user_id)
    }
}
