//! Storage error types.
//!
//! Used by repository implementations and the state stores; converted into
//! [`qbot_core::BotError`] at the crate boundary.

use qbot_core::BotError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Redis error: {0}")]
    Redis(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StorageError::AlreadyExists(db.message().to_string())
            }
            sqlx::Error::RowNotFound => StorageError::NotFound("row".to_string()),
            other => StorageError::Database(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(e: redis::RedisError) -> Self {
        StorageError::Redis(e.to_string())
    }
}

impl From<StorageError> for BotError {
    fn from(e: StorageError) -> Self {
        BotError::Storage(e.to_string())
    }
}

/// Maps a sqlx failure straight into the bot error taxonomy.
pub(crate) fn db_error(e: sqlx::Error) -> BotError {
    StorageError::from(e).into()
}
