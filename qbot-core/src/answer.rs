//! The [`Answer`] abstraction and the outbound request descriptor it produces.
//!
//! Every routing component, decorator and domain handler is an [`Answer`]: given an
//! [`Update`] it returns the ordered list of requests the delivery layer must send.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use teloxide::types::InlineKeyboardMarkup;

use crate::error::Result;
use crate::update::Update;

/// Bot API method a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endpoint {
    SendMessage,
    SendAudio,
    EditMessageReplyMarkup,
    AnswerInlineQuery,
    AnswerCallbackQuery,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::SendMessage => "sendMessage",
            Endpoint::SendAudio => "sendAudio",
            Endpoint::EditMessageReplyMarkup => "editMessageReplyMarkup",
            Endpoint::AnswerInlineQuery => "answerInlineQuery",
            Endpoint::AnswerCallbackQuery => "answerCallbackQuery",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prepared Bot API call, always delivered as a JSON POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TgRequest {
    pub endpoint: Endpoint,
    pub params: Map<String, Value>,
}

impl TgRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Map::new(),
        }
    }

    pub fn send_message() -> Self {
        Self::new(Endpoint::SendMessage)
    }

    /// Sets (or overwrites) a parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_chat_id(self, chat_id: i64) -> Self {
        self.with_param("chat_id", chat_id)
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_param("text", text.into())
    }

    /// Serializes the keyboard the way the Bot API expects it: as a JSON string.
    pub fn with_markup(self, markup: &InlineKeyboardMarkup) -> Result<Self> {
        let serialized = serde_json::to_string(markup)?;
        Ok(self.with_param("reply_markup", serialized))
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.params.get("chat_id").and_then(Value::as_i64)
    }

    pub fn text(&self) -> Option<&str> {
        self.params.get("text").and_then(Value::as_str)
    }

    /// Parses `reply_markup` back into a keyboard.
    pub fn markup(&self) -> Option<InlineKeyboardMarkup> {
        self.params
            .get("reply_markup")
            .and_then(Value::as_str)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Builds the ordered list of outbound requests for an update.
#[async_trait]
pub trait Answer: Send + Sync {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>>;
}

#[async_trait]
impl<T: Answer + ?Sized> Answer for Arc<T> {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        (**self).build(update).await
    }
}

#[async_trait]
impl<T: Answer + ?Sized> Answer for Box<T> {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        (**self).build(update).await
    }
}

/// Produces an inline keyboard for an update (may consult storage).
#[async_trait]
pub trait Keyboard: Send + Sync {
    async fn generate(&self, update: &Update) -> Result<InlineKeyboardMarkup>;
}

#[async_trait]
impl<T: Keyboard + ?Sized> Keyboard for Arc<T> {
    async fn generate(&self, update: &Update) -> Result<InlineKeyboardMarkup> {
        (**self).generate(update).await
    }
}
