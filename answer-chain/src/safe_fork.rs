//! Router wrapper that turns "no route matched" into a fallback reply.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update};
use tracing::{info, instrument};

use crate::combinators::text_to_sender;
use crate::fork::{Routed, Router};

/// Reply sent when nothing in the route table matched.
pub const FALLBACK_TEXT: &str = "Я не знаю как отвечать на такое сообщение";

/// Wraps a router and answers [`Routed::Unhandled`] with a fallback.
///
/// Only the unhandled outcome is recovered. Every other error of the routed answer
/// propagates unchanged, so storage or transport failures are never masked.
#[derive(Clone)]
pub struct SafeFork<R: Router> {
    origin: R,
    fallback: Arc<dyn Answer>,
}

impl<R: Router> SafeFork<R> {
    pub fn new(origin: R) -> Self {
        Self {
            origin,
            fallback: Arc::new(text_to_sender(FALLBACK_TEXT)),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Answer + 'static) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }
}

#[async_trait]
impl<R: Router> Answer for SafeFork<R> {
    #[instrument(skip(self, update), fields(update_id = ?update.update_id()))]
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match self.origin.dispatch(update).await {
            Ok(Routed::Handled(requests)) => Ok(requests),
            Ok(Routed::Unhandled) | Err(BotError::Unhandled) => {
                info!("Update unhandled, sending fallback");
                self.fallback.build(update).await
            }
            Err(e) => Err(e),
        }
    }
}
