//! `/status`: reachability of the database and the state store.

use std::sync::Arc;

use answer_chain::text_to_sender;
use async_trait::async_trait;
use qbot_core::{Answer, Result, TgRequest, Update, UserStateRepository};
use storage::UserRepository;
use tracing::warn;

/// Reports whether both backends answer and how many users are active. A failing backend
/// is reported in the text, not as an error.
#[derive(Clone)]
pub struct StatusAnswer {
    users: UserRepository,
    states: Arc<dyn UserStateRepository>,
}

impl StatusAnswer {
    pub fn new(users: UserRepository, states: Arc<dyn UserStateRepository>) -> Self {
        Self { users, states }
    }
}

#[async_trait]
impl Answer for StatusAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let database = match self.users.active_count().await {
            Ok(active) => format!("ok, активных пользователей: {}", active),
            Err(e) => {
                warn!(error = %e, "Database status check failed");
                "недоступна".to_string()
            }
        };
        let state_store = match self.states.step(chat_id).await {
            Ok(_) => "ok",
            Err(e) => {
                warn!(error = %e, "State store status check failed");
                "недоступно"
            }
        };

        text_to_sender(format!(
            "База данных: {}\nХранилище состояний: {}",
            database, state_store
        ))
        .build(update)
        .await
    }
}
