//! Per-chat conversation step persisted under `"{chat_id}:step"`.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Result, UserStateRepository, UserStep};
use tracing::{info, instrument};

use crate::state_store::StateStore;

/// [`UserStateRepository`] over a [`StateStore`]. A missing key reads as [`UserStep::Nothing`].
#[derive(Clone)]
pub struct UserStates {
    store: Arc<dyn StateStore>,
}

impl UserStates {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    fn key(chat_id: i64) -> String {
        format!("{}:step", chat_id)
    }
}

#[async_trait]
impl UserStateRepository for UserStates {
    async fn step(&self, chat_id: i64) -> Result<UserStep> {
        match self.store.get(&Self::key(chat_id)).await? {
            Some(value) => value.parse(),
            None => Ok(UserStep::Nothing),
        }
    }

    #[instrument(skip(self))]
    async fn change_step(&self, chat_id: i64, step: UserStep) -> Result<()> {
        self.store.set(&Self::key(chat_id), step.as_str()).await?;
        info!(chat_id, step = %step, "step: user state changed");
        Ok(())
    }
}
