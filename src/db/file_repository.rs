use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Stored binary file (avatar images)
#[derive(Debug, Clone, FromRow)]
pub struct StoredFile {
    pub id: i64,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Binary file repository for SQLite operations
#[derive(Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a file and return its id
    pub async fn store_file(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO files (filename, content_type, data, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(filename)
        .bind(content_type)
        .bind(data)
        .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        let file_id = result.last_insert_rowid();
        tracing::info!(file_id, filename, size = data.len(), "File stored");

        Ok(file_id)
    }

    /// Get file by ID
    pub async fn find_file(&self, file_id: i64) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(
            "SELECT id, filename, content_type, data, created_at FROM files WHERE id = ?",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }
}
