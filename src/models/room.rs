use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Chat room row. Direct rooms hold exactly two members; `user_a` is the
/// first id of the pair as submitted at creation time.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRoom {
    pub id: i64,
    pub kind: String,
    pub user_a: i64,
    pub user_b: i64,
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    pub fn has_member(&self, user_id: i64) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The other member of a direct room, if `user_id` belongs to it
    pub fn partner_of(&self, user_id: i64) -> Option<i64> {
        if self.user_a == user_id {
            Some(self.user_b)
        } else if self.user_b == user_id {
            Some(self.user_a)
        } else {
            None
        }
    }
}

/// Request to create a direct room between two users
#[derive(Debug, Deserialize)]
pub struct DirectRoomRequest {
    pub user_ids: Vec<i64>,
}

/// Room representation returned to clients. `name` and `avatar_url`
/// describe the chat partner from the caller's point of view.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRoomResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_ids: Vec<i64>,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRoomsListResponse {
    pub chat_rooms: Vec<ChatRoomResponse>,
}
