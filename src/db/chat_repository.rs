use chrono::{SecondsFormat, SubsecRound, Utc};
use sqlx::SqlitePool;

use crate::db::is_unique_violation;
use crate::error::{AppError, Result};
use crate::models::{ChatRoom, Message};

/// Chat room and message repository for SQLite operations
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== Room Operations ====================

    /// Create a direct room between two users. The unique pair index rejects
    /// a second room for the same two users in either order, so concurrent
    /// creates resolve to exactly one row.
    pub async fn create_direct_room(&self, user_a: i64, user_b: i64) -> Result<ChatRoom> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO chat_rooms (kind, user_a, user_b, created_at) \
             VALUES ('direct', ?, ?, ?)",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::Conflict("Chat room already exists".to_string())
            } else {
                AppError::from(err)
            }
        })?;

        let room_id = result.last_insert_rowid();
        tracing::info!(room_id, user_a, user_b, "Direct room created");

        Ok(ChatRoom {
            id: room_id,
            kind: "direct".to_string(),
            user_a,
            user_b,
            created_at,
        })
    }

    /// Get room by ID
    pub async fn find_room(&self, room_id: i64) -> Result<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoom>(
            "SELECT id, kind, user_a, user_b, created_at FROM chat_rooms WHERE id = ?",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Find the direct room between two users, regardless of pair order
    pub async fn find_direct_room(&self, user_a: i64, user_b: i64) -> Result<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoom>(
            "SELECT id, kind, user_a, user_b, created_at FROM chat_rooms \
             WHERE kind = 'direct' \
               AND ((user_a = ? AND user_b = ?) OR (user_a = ? AND user_b = ?))",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// All rooms the user is a member of
    pub async fn list_rooms_for_user(&self, user_id: i64) -> Result<Vec<ChatRoom>> {
        let rooms = sqlx::query_as::<_, ChatRoom>(
            "SELECT id, kind, user_a, user_b, created_at FROM chat_rooms \
             WHERE user_a = ? OR user_b = ? \
             ORDER BY id",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    // ==================== Message Operations ====================

    /// Insert a message and return the stored row
    pub async fn insert_message(
        &self,
        room_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<Message> {
        // Truncated to the stored micros so the returned row equals a re-read
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO messages (chat_room_id, user_id, content, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(room_id)
        .bind(user_id)
        .bind(content)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id: result.last_insert_rowid(),
            chat_room_id: room_id,
            user_id,
            content: content.to_string(),
            created_at,
        })
    }

    /// Page through a room's history, newest first. `page` starts at 1.
    /// Rows with equal timestamps are ordered by descending id, so page
    /// boundaries stay stable across requests.
    pub async fn list_messages(
        &self,
        room_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Message>> {
        let offset = (i64::from(page) - 1) * i64::from(page_size);

        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, chat_room_id, user_id, content, created_at FROM messages \
             WHERE chat_room_id = ? \
             ORDER BY created_at DESC, id DESC \
             LIMIT ? OFFSET ?",
        )
        .bind(room_id)
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
