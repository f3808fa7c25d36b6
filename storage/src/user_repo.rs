//! Registered users: activity flag, chosen city, referrer.

use qbot_core::{BotError, Result};
use tracing::info;

use crate::error::{db_error, StorageError};
use crate::models::User;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Fails with [`BotError::UserAlreadyExists`] when the chat is already registered.
    pub async fn create(&self, chat_id: i64, referrer_id: Option<i64>) -> Result<()> {
        sqlx::query("INSERT INTO users (chat_id, referrer_id) VALUES (?, ?)")
            .bind(chat_id)
            .bind(referrer_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(|e| match StorageError::from(e) {
                StorageError::AlreadyExists(_) => BotError::UserAlreadyExists(chat_id),
                other => other.into(),
            })?;
        info!(chat_id, "User registered");
        Ok(())
    }

    pub async fn get(&self, chat_id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT chat_id, is_active, day, city_id, referrer_id FROM users WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)?
        .ok_or(BotError::UserNotFound(chat_id))
    }

    pub async fn exists(&self, chat_id: i64) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }

    pub async fn active_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active = 1")
            .fetch_one(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        Ok(count)
    }

    pub async fn update_city(&self, chat_id: i64, city_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET city_id = ? WHERE chat_id = ?")
            .bind(city_id)
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        if result.rows_affected() == 0 {
            return Err(BotError::UserNotFound(chat_id));
        }
        info!(chat_id, city_id = %city_id, "User city updated");
        Ok(())
    }

    pub async fn set_active(&self, chat_id: i64, is_active: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = ? WHERE chat_id = ?")
            .bind(is_active)
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        info!(chat_id, is_active, "User activity changed");
        Ok(())
    }
}
