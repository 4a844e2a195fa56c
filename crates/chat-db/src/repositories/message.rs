//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use chat_core::entities::{Message, NewMessage};
use chat_core::traits::{HistoryQuery, MessageRepository, RepoResult};
use chat_core::value_objects::RoomId;

use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found, room_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(room = %message.room_id, uuid = %message.uuid))]
    async fn create(&self, message: &NewMessage) -> RepoResult<Message> {
        let row = sqlx::query_as::<_, MessageModel>(
            r#"
            WITH inserted AS (
                INSERT INTO messages (uuid, room_id, user_id, content)
                SELECT $1, r.id, $3, $4
                FROM rooms r
                WHERE r.uuid = $2
                RETURNING id, uuid, room_id, user_id, content, created_at, updated_at
            )
            SELECT i.id, i.uuid, r.uuid AS room_uuid, i.user_id, u.name AS author_name,
                   i.content, i.created_at, i.updated_at
            FROM inserted i
            JOIN rooms r ON r.id = i.room_id
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(message.uuid)
        .bind(message.room_id.as_str())
        .bind(message.author_id.into_inner())
        .bind(&message.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| room_not_found(&message.room_id))?;

        Message::try_from(row)
    }

    #[instrument(skip(self))]
    async fn find_by_uuid(&self, room_id: &RoomId, uuid: Uuid) -> RepoResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.uuid, r.uuid AS room_uuid, m.user_id, u.name AS author_name,
                   m.content, m.created_at, m.updated_at
            FROM messages m
            JOIN rooms r ON r.id = m.room_id
            JOIN users u ON u.id = m.user_id
            WHERE r.uuid = $1 AND m.uuid = $2 AND m.deleted_at IS NULL
            "#,
        )
        .bind(room_id.as_str())
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Message::try_from).transpose()
    }

    #[instrument(skip(self, content))]
    async fn update_content(&self, uuid: Uuid, content: &str) -> RepoResult<Message> {
        let row = sqlx::query_as::<_, MessageModel>(
            r#"
            WITH updated AS (
                UPDATE messages
                SET content = $2, updated_at = now()
                WHERE uuid = $1 AND deleted_at IS NULL
                RETURNING id, uuid, room_id, user_id, content, created_at, updated_at
            )
            SELECT m.id, m.uuid, r.uuid AS room_uuid, m.user_id, u.name AS author_name,
                   m.content, m.created_at, m.updated_at
            FROM updated m
            JOIN rooms r ON r.id = m.room_id
            JOIN users u ON u.id = m.user_id
            "#,
        )
        .bind(uuid)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| message_not_found(uuid))?;

        Message::try_from(row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, uuid: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET deleted_at = now()
            WHERE uuid = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(uuid)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(uuid));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, room_id: &RoomId, query: HistoryQuery) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.uuid, r.uuid AS room_uuid, m.user_id, u.name AS author_name,
                   m.content, m.created_at, m.updated_at
            FROM messages m
            JOIN rooms r ON r.id = m.room_id
            JOIN users u ON u.id = m.user_id
            WHERE r.uuid = $1 AND m.deleted_at IS NULL
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(room_id.as_str())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Message::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn room_exists(&self, room_id: &RoomId) -> RepoResult<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rooms WHERE uuid = $1)")
            .bind(room_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(exists.0)
    }
}
