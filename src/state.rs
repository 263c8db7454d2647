use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::config::Config;
use crate::db::{ChatRepository, FileRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Message, User};
use crate::ws::{ChannelRegistry, ServerFrame};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserRepository>,
    pub chats: Arc<ChatRepository>,
    pub files: Arc<FileRepository>,
    pub registry: Arc<ChannelRegistry>,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let auth = AuthService::new(&config);
        let registry = ChannelRegistry::new(Duration::from_millis(config.delivery_timeout_ms));

        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            users: Arc::new(UserRepository::new(pool.clone())),
            chats: Arc::new(ChatRepository::new(pool.clone())),
            files: Arc::new(FileRepository::new(pool)),
            registry: Arc::new(registry),
        }
    }

    /// Resolve a bearer token to its user
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.auth.validate_token(token)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))
    }

    /// Store a message, then fan it out to the room's current subscribers.
    /// Shared by the WebSocket and HTTP submission paths; a failed store
    /// broadcasts nothing.
    pub async fn submit_message(
        &self,
        sender: &User,
        chat_room_id: i64,
        content: &str,
    ) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Message content must not be empty".to_string(),
            ));
        }

        let room = self
            .chats
            .find_room(chat_room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat room not found".to_string()))?;

        if !room.has_member(sender.id) {
            return Err(AppError::Forbidden(
                "Not a member of this chat room".to_string(),
            ));
        }

        let message = self
            .chats
            .insert_message(chat_room_id, sender.id, content)
            .await?;

        self.registry
            .broadcast(chat_room_id, ServerFrame::message(message.clone()))
            .await;

        Ok(message)
    }
}
