use chrono::{SecondsFormat, SubsecRound, Utc};
use sqlx::SqlitePool;

use crate::db::is_unique_violation;
use crate::error::{AppError, Result};
use crate::models::User;

const DEFAULT_DISPLAY_NAME: &str = "New User";

/// User repository for SQLite operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== Account Operations ====================

    /// Create a user account. New accounts start with the default display name.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, display_name, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(DEFAULT_DISPLAY_NAME)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::BadRequest("Email already exists".to_string())
            } else {
                AppError::from(err)
            }
        })?;

        let user_id = result.last_insert_rowid();
        tracing::info!(user_id, "User registered");

        Ok(User {
            id: user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            avatar_file_id: None,
            created_at,
        })
    }

    /// Get user by ID
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, avatar_file_id, created_at \
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, avatar_file_id, created_at \
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // ==================== Profile Operations ====================

    /// Change the display name. Returns the number of updated rows.
    pub async fn update_display_name(&self, user_id: i64, display_name: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET display_name = ? WHERE id = ?")
            .bind(display_name)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Point the user's avatar at a stored file. Returns the number of updated rows.
    pub async fn set_avatar(&self, user_id: i64, file_id: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET avatar_file_id = ? WHERE id = ?")
            .bind(file_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Database connectivity probe for the health endpoint
    pub async fn health_check(&self) -> Result<bool> {
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }
}
