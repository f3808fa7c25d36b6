//! Key-value store behind per-chat state: `get(key)`, `set(key, value)`.
//!
//! Keys follow the `"{chat_id}:{purpose}"` convention. Redis backs production; the
//! in-memory store serves tests and runs without `REDIS_URL`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::Result;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::StorageError;

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

/// Process-local store.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redis-backed store over one shared [`ConnectionManager`]; every operation clones the
/// handle, and the manager reconnects after a dropped connection.
#[derive(Clone)]
pub struct RedisStateStore {
    connection: ConnectionManager,
}

impl RedisStateStore {
    /// Opens the connection; an invalid URL or an unreachable server fails here.
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!(redis_url = %redis_url, "Connecting state store to Redis");
        let client = redis::Client::open(redis_url).map_err(StorageError::from)?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(StorageError::from)?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(StorageError::from)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set(key, value).await.map_err(StorageError::from)?;
        Ok(())
    }
}
