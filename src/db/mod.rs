pub mod chat_repository;
pub mod file_repository;
pub mod user_repository;

pub use chat_repository::ChatRepository;
pub use file_repository::{FileRepository, StoredFile};
pub use user_repository::UserRepository;

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::fs;

use crate::config::Config;
use crate::error::{AppError, Result};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create the SQLite connection pool for the configured database
pub async fn create_pool(config: &Config) -> Result<SqlitePool> {
    prepare_database(&config.database_url, config.db_max_connections).await
}

/// Connect to the database, apply connection PRAGMAs and run migrations
pub async fn prepare_database(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    ensure_sqlite_path(database_url).await?;

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", database_url, e))
        })?;

    // Enforce foreign keys for SQLite
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode for concurrent readers
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Busy timeout to avoid database-locked errors
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    MIGRATOR.run(&pool).await?;

    tracing::info!(url = %database_url, "Database ready");
    Ok(pool)
}

/// Ensure the SQLite database file and its directory exist
async fn ensure_sqlite_path(url: &str) -> Result<()> {
    let Some(sqlite_path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };

    if sqlite_path == ":memory:" {
        return Ok(());
    }

    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::InternalError(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    if fs::metadata(path).await.is_err() {
        fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .await
            .map_err(|e| {
                AppError::InternalError(format!(
                    "Failed to create database file {}: {}",
                    path.display(),
                    e
                ))
            })?;
    }

    Ok(())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    prepare_database("sqlite::memory:", 1)
        .await
        .expect("in-memory database should initialize")
}
