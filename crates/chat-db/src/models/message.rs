//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A `messages` row joined with its room's public id and author's name
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub uuid: Uuid,
    pub room_uuid: String,
    pub user_id: i64,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
