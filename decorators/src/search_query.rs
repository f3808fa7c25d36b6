use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update};
use storage::AyatSearchQuery;

/// Stores the message text as the chat's search query before delegating, so pagination
/// callbacks arriving later can rebuild the same result set.
#[derive(Clone)]
pub struct CachedSearchQuery {
    origin: Arc<dyn Answer>,
    queries: AyatSearchQuery,
}

impl CachedSearchQuery {
    pub fn new(origin: impl Answer + 'static, queries: AyatSearchQuery) -> Self {
        Self {
            origin: Arc::new(origin),
            queries,
        }
    }
}

#[async_trait]
impl Answer for CachedSearchQuery {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let text = update
            .text()
            .ok_or_else(|| BotError::MalformedUpdate("search query without text".to_string()))?;
        self.queries.write(update.chat_id()?, text).await?;
        self.origin.build(update).await
    }
}
