//! Component factory: builds the storage-backed collaborators from config.

use std::sync::Arc;

use anyhow::{Context, Result};
use qbot_core::UserStateRepository;
use storage::{
    AyatSearchQuery, InMemoryStateStore, RedisStateStore, SqlitePoolManager, StateStore,
    UserStates,
};
use tracing::{info, instrument};

use crate::config::BotConfig;

/// Shared dependencies of the route table.
#[derive(Clone)]
pub struct BotComponents {
    pub pool_manager: SqlitePoolManager,
    pub states: Arc<dyn UserStateRepository>,
    pub queries: AyatSearchQuery,
    pub admin_chat_ids: Vec<i64>,
}

impl BotComponents {
    pub fn new(
        pool_manager: SqlitePoolManager,
        state_store: Arc<dyn StateStore>,
        admin_chat_ids: Vec<i64>,
    ) -> Self {
        Self {
            pool_manager,
            states: Arc::new(UserStates::new(state_store.clone())),
            queries: AyatSearchQuery::new(state_store),
            admin_chat_ids,
        }
    }
}

/// Opens the database (creating the schema) and picks the state store: Redis when
/// REDIS_URL is set, in-memory otherwise.
#[instrument(skip(config))]
pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let pool_manager = SqlitePoolManager::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let state_store: Arc<dyn StateStore> = match &config.redis_url {
        Some(url) => {
            info!("Using Redis state store");
            Arc::new(
                RedisStateStore::new(url)
                    .await
                    .context("Failed to connect to REDIS_URL")?,
            )
        }
        None => {
            info!("Using in-memory state store");
            Arc::new(InMemoryStateStore::new())
        }
    };

    Ok(BotComponents::new(
        pool_manager,
        state_store,
        config.admin_chat_ids()?,
    ))
}
