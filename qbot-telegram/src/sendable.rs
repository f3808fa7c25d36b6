//! Delivery of prepared requests to the Bot API.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{BotError, Result, TgRequest};
use serde_json::Value;
use storage::UserRepository;
use tracing::{debug, instrument, warn};

use crate::config::TelegramConfig;

/// Sends requests in order and returns the decoded API responses.
#[async_trait]
pub trait Sendable: Send + Sync {
    async fn send(&self, requests: &[TgRequest]) -> Result<Vec<Value>>;
}

#[async_trait]
impl<T: Sendable + ?Sized> Sendable for Arc<T> {
    async fn send(&self, requests: &[TgRequest]) -> Result<Vec<Value>> {
        (**self).send(requests).await
    }
}

/// reqwest-backed delivery. A non-success status fails with [`BotError::Telegram`]
/// carrying the response body; later requests of the batch are not sent.
#[derive(Clone)]
pub struct HttpSendable {
    client: reqwest::Client,
    config: Arc<TelegramConfig>,
}

impl HttpSendable {
    pub fn new(client: reqwest::Client, config: TelegramConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    async fn send_one(&self, request: &TgRequest) -> Result<Value> {
        let url = self.config.method_url(request.endpoint.as_str());
        let response = self
            .client
            .post(&url)
            .json(&request.params)
            .send()
            .await
            .map_err(|e| BotError::Telegram(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Telegram(e.to_string()))?;
        if !status.is_success() {
            return Err(BotError::Telegram(body));
        }
        debug!(endpoint = %request.endpoint, status = status.as_u16(), "Request delivered");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Sendable for HttpSendable {
    #[instrument(skip(self, requests), fields(count = requests.len()))]
    async fn send(&self, requests: &[TgRequest]) -> Result<Vec<Value>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.send_one(request).await?);
        }
        Ok(responses)
    }
}

/// Sends each request on its own. A "user blocked the bot" style failure marks the chat
/// of that request inactive and the batch carries on with the next request; other
/// failures pass through.
pub struct UnreachableSafeSendable {
    origin: Arc<dyn Sendable>,
    users: UserRepository,
}

impl UnreachableSafeSendable {
    pub fn new(origin: impl Sendable + 'static, users: UserRepository) -> Self {
        Self {
            origin: Arc::new(origin),
            users,
        }
    }
}

#[async_trait]
impl Sendable for UnreachableSafeSendable {
    async fn send(&self, requests: &[TgRequest]) -> Result<Vec<Value>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            match self.origin.send(std::slice::from_ref(request)).await {
                Ok(delivered) => responses.extend(delivered),
                Err(e) if e.is_unreachable_user() => match request.chat_id() {
                    Some(chat_id) => {
                        self.users.set_active(chat_id, false).await?;
                        warn!(chat_id, error = %e, "User unreachable, marked inactive");
                    }
                    None => warn!(endpoint = %request.endpoint, error = %e, "User unreachable"),
                },
                Err(e) => return Err(e),
            }
        }
        Ok(responses)
    }
}
