//! Last text-search query of a chat, so later pagination callbacks can rebuild the result set.

use std::sync::Arc;

use qbot_core::{BotError, Result};
use tracing::debug;

use crate::state_store::StateStore;

#[derive(Clone)]
pub struct AyatSearchQuery {
    store: Arc<dyn StateStore>,
}

impl AyatSearchQuery {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    fn key(chat_id: i64) -> String {
        format!("{}:ayat_search_query", chat_id)
    }

    /// Stores the query, replacing any previous one.
    pub async fn write(&self, chat_id: i64, query: &str) -> Result<()> {
        self.store.set(&Self::key(chat_id), query).await?;
        debug!(chat_id, query = %query, "Search query cached");
        Ok(())
    }

    /// Fails with [`BotError::SearchQueryNotFound`] when the chat never searched.
    pub async fn read(&self, chat_id: i64) -> Result<String> {
        let query = self
            .store
            .get(&Self::key(chat_id))
            .await?
            .ok_or(BotError::SearchQueryNotFound(chat_id))?;
        debug!(chat_id, query = %query, "Search query read");
        Ok(query)
    }
}
