//! Editable bot texts (start message, help) keyed by name.

use qbot_core::Result;

use crate::error::{db_error, StorageError};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AdminMessageRepository {
    pool_manager: SqlitePoolManager,
}

impl AdminMessageRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn get(&self, key: &str) -> Result<String> {
        let row: Option<(String,)> = sqlx::query_as("SELECT text FROM admin_messages WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        row.map(|(text,)| text)
            .ok_or_else(|| StorageError::NotFound(format!("admin message '{}'", key)).into())
    }

    /// Inserts or replaces the text.
    pub async fn set(&self, key: &str, text: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO admin_messages (key, text) VALUES (?, ?)")
            .bind(key)
            .bind(text)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
