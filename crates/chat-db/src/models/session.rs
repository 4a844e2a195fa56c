//! Session database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub user_id: i64,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}
