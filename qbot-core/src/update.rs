//! Read-only view over one inbound Telegram update.
//!
//! The raw payload is kept as received; the typed view is decoded on first access and
//! memoized for the lifetime of the [`Update`]. Telegram (and our own fixtures) place the
//! chat in several spots, so chat id resolution looks for a `chat` object first and falls
//! back to a `from` object.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{BotError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
struct RawUpdate {
    update_id: Option<i64>,
    message: Option<RawMessage>,
    callback_query: Option<RawCallbackQuery>,
    inline_query: Option<RawInlineQuery>,
    chat: Option<RawIdentity>,
    from: Option<RawIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawMessage {
    message_id: Option<i64>,
    text: Option<String>,
    chat: Option<RawIdentity>,
    from: Option<RawIdentity>,
    location: Option<Coordinates>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCallbackQuery {
    id: Option<String>,
    data: Option<String>,
    from: Option<RawIdentity>,
    message: Option<RawMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawInlineQuery {
    id: Option<String>,
    query: Option<String>,
    from: Option<RawIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawIdentity {
    id: Option<i64>,
}

/// Geographic point attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One inbound event (message, button press, inline query).
#[derive(Debug)]
pub struct Update {
    raw: String,
    parsed: OnceLock<std::result::Result<RawUpdate, String>>,
}

impl Update {
    /// Wraps a raw JSON payload. Decoding is deferred until an accessor is called.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            parsed: OnceLock::new(),
        }
    }

    /// The payload exactly as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn parsed(&self) -> Result<&RawUpdate> {
        self.parsed
            .get_or_init(|| serde_json::from_str(&self.raw).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| BotError::MalformedUpdate(format!("invalid json: {}", e)))
    }

    pub fn update_id(&self) -> Option<i64> {
        self.parsed().ok().and_then(|u| u.update_id)
    }

    /// Chat to reply to. Looks for a `chat` object first, then for a `from` object.
    pub fn chat_id(&self) -> Result<i64> {
        let update = self.parsed()?;
        let callback_message = update
            .callback_query
            .as_ref()
            .and_then(|q| q.message.as_ref());
        let chats = [
            update.chat.as_ref(),
            update.message.as_ref().and_then(|m| m.chat.as_ref()),
            callback_message.and_then(|m| m.chat.as_ref()),
        ];
        let senders = [
            update.from.as_ref(),
            update.message.as_ref().and_then(|m| m.from.as_ref()),
            update.callback_query.as_ref().and_then(|q| q.from.as_ref()),
            update.inline_query.as_ref().and_then(|q| q.from.as_ref()),
        ];
        chats
            .into_iter()
            .chain(senders)
            .flatten()
            .find_map(|identity| identity.id)
            .ok_or_else(|| BotError::MalformedUpdate("chat id not found".to_string()))
    }

    /// Text of an incoming message. Button presses carry no text of their own.
    pub fn text(&self) -> Option<&str> {
        self.parsed()
            .ok()?
            .message
            .as_ref()?
            .text
            .as_deref()
    }

    pub fn callback_data(&self) -> Option<&str> {
        self.parsed()
            .ok()?
            .callback_query
            .as_ref()?
            .data
            .as_deref()
    }

    pub fn callback_query_id(&self) -> Option<&str> {
        self.parsed()
            .ok()?
            .callback_query
            .as_ref()?
            .id
            .as_deref()
    }

    /// Message to edit: the message itself or the message a button belongs to.
    pub fn message_id(&self) -> Result<i64> {
        let update = self.parsed()?;
        update
            .message
            .as_ref()
            .and_then(|m| m.message_id)
            .or_else(|| {
                update
                    .callback_query
                    .as_ref()
                    .and_then(|q| q.message.as_ref())
                    .and_then(|m| m.message_id)
            })
            .ok_or_else(|| BotError::MalformedUpdate("message id not found".to_string()))
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.parsed().ok()?.message.as_ref()?.location
    }

    pub fn is_inline_query(&self) -> bool {
        self.parsed()
            .map(|u| u.inline_query.is_some())
            .unwrap_or(false)
    }

    pub fn inline_query_id(&self) -> Option<&str> {
        self.parsed().ok()?.inline_query.as_ref()?.id.as_deref()
    }

    pub fn inline_query(&self) -> Option<&str> {
        self.parsed().ok()?.inline_query.as_ref()?.query.as_deref()
    }
}
