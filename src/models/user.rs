use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account row
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub avatar_file_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public avatar URL. Users without an uploaded avatar get a
    /// generated initials image.
    pub fn avatar_url(&self, api_url: &str) -> String {
        match self.avatar_file_id {
            Some(file_id) => format!("{}/images/{}", api_url, file_id),
            None => format!(
                "https://ui-avatars.com/api/?name={}",
                self.display_name.replace(' ', "+")
            ),
        }
    }
}

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Response after registering
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token issued on login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Profile of the authenticated user
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Request to change the profile display name
#[derive(Debug, Deserialize)]
pub struct DisplayNameUpdate {
    pub display_name: String,
}

/// Public view of another user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDisplayResponse {
    pub display_name: String,
}

/// Response after uploading an avatar
#[derive(Debug, Serialize)]
pub struct AvatarUploadResponse {
    pub file_id: i64,
}

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id, decimal
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
