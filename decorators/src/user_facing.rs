use std::sync::Arc;

use answer_chain::text_to_sender;
use async_trait::async_trait;
use qbot_core::{Answer, Result, TgRequest, Update};
use tracing::info;

/// Recovers domain-not-found failures (unknown ayat, unsupported city, expired search
/// context, ...) into a text reply to the sender. Every other error propagates.
#[derive(Clone)]
pub struct UserFacingSafe {
    origin: Arc<dyn Answer>,
}

impl UserFacingSafe {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for UserFacingSafe {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match self.origin.build(update).await {
            Ok(requests) => Ok(requests),
            Err(e) => match e.user_message() {
                Some(text) => {
                    info!(error = %e, "Domain failure answered to user");
                    text_to_sender(text).build(update).await
                }
                None => Err(e),
            },
        }
    }
}
