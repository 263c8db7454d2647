use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub chat_room_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Message submission, shared by the HTTP and WebSocket paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub chat_room_id: i64,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}
