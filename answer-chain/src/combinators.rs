//! Answer combinators: base answers and decorators that rewrite the requests of an inner answer.
//!
//! Each decorator holds only its inner stage. [`AnswerExt`] gives the builder-style
//! construction used when wiring the route table:
//!
//! ```ignore
//! MessageAnswer.with_text("Введите слово для поиска:").html().to_sender()
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Answer, Endpoint, Keyboard, Result, TgRequest, Update};
use tracing::debug;

/// Produces no requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAnswer;

#[async_trait]
impl Answer for EmptyAnswer {
    async fn build(&self, _update: &Update) -> Result<Vec<TgRequest>> {
        Ok(Vec::new())
    }
}

/// One bare `sendMessage` request; decorators fill in text, recipient and markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAnswer;

#[async_trait]
impl Answer for MessageAnswer {
    async fn build(&self, _update: &Update) -> Result<Vec<TgRequest>> {
        Ok(vec![TgRequest::send_message()])
    }
}

/// Sets `text` on every request of the inner answer.
#[derive(Clone)]
pub struct TextAnswer {
    origin: Arc<dyn Answer>,
    text: String,
}

impl TextAnswer {
    pub fn new(origin: impl Answer + 'static, text: impl Into<String>) -> Self {
        Self {
            origin: Arc::new(origin),
            text: text.into(),
        }
    }
}

#[async_trait]
impl Answer for TextAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|request| request.with_text(self.text.clone()))
            .collect())
    }
}

/// Switches every request to HTML parse mode.
#[derive(Clone)]
pub struct HtmlAnswer {
    origin: Arc<dyn Answer>,
}

impl HtmlAnswer {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for HtmlAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|request| request.with_param("parse_mode", "HTML"))
            .collect())
    }
}

/// Addresses every request to the chat the update came from.
#[derive(Clone)]
pub struct ToSender {
    origin: Arc<dyn Answer>,
}

impl ToSender {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for ToSender {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|request| request.with_chat_id(chat_id))
            .collect())
    }
}

/// Addresses every request to a fixed chat, e.g. an admin chat.
#[derive(Clone)]
pub struct ToChatId {
    origin: Arc<dyn Answer>,
    chat_id: i64,
}

impl ToChatId {
    pub fn new(origin: impl Answer + 'static, chat_id: i64) -> Self {
        Self {
            origin: Arc::new(origin),
            chat_id,
        }
    }
}

#[async_trait]
impl Answer for ToChatId {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|request| request.with_chat_id(self.chat_id))
            .collect())
    }
}

/// Sets `message_id` of the update on every request, for edits.
#[derive(Clone)]
pub struct MessageIdAnswer {
    origin: Arc<dyn Answer>,
}

impl MessageIdAnswer {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for MessageIdAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let message_id = update.message_id()?;
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|request| request.with_param("message_id", message_id))
            .collect())
    }
}

/// Retargets every request to `editMessageReplyMarkup`.
#[derive(Clone)]
pub struct KeyboardEditAnswer {
    origin: Arc<dyn Answer>,
}

impl KeyboardEditAnswer {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for KeyboardEditAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        Ok(self
            .origin
            .build(update)
            .await?
            .into_iter()
            .map(|mut request| {
                request.params.remove("text");
                request.params.remove("parse_mode");
                request.with_endpoint(Endpoint::EditMessageReplyMarkup)
            })
            .collect())
    }
}

/// Attaches a keyboard to the first (primary) request of the inner answer.
#[derive(Clone)]
pub struct Markup {
    origin: Arc<dyn Answer>,
    keyboard: Arc<dyn Keyboard>,
}

impl Markup {
    pub fn new(origin: impl Answer + 'static, keyboard: impl Keyboard + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
            keyboard: Arc::new(keyboard),
        }
    }
}

#[async_trait]
impl Answer for Markup {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let mut requests = self.origin.build(update).await?;
        if requests.is_empty() {
            return Ok(requests);
        }
        let markup = self.keyboard.generate(update).await?;
        let primary = requests.remove(0).with_markup(&markup)?;
        requests.insert(0, primary);
        Ok(requests)
    }
}

/// Appends an `answerCallbackQuery` for button presses so the client stops its spinner.
/// Other updates pass through unchanged.
#[derive(Clone)]
pub struct CallbackAck {
    origin: Arc<dyn Answer>,
}

impl CallbackAck {
    pub fn new(origin: impl Answer + 'static) -> Self {
        Self {
            origin: Arc::new(origin),
        }
    }
}

#[async_trait]
impl Answer for CallbackAck {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let mut requests = self.origin.build(update).await?;
        if let Some(id) = update.callback_query_id() {
            requests.push(
                TgRequest::new(Endpoint::AnswerCallbackQuery).with_param("callback_query_id", id),
            );
        }
        Ok(requests)
    }
}

/// Builds each answer in turn and concatenates the results. Any failure aborts the batch.
#[derive(Clone, Default)]
pub struct AnswerList {
    answers: Vec<Arc<dyn Answer>>,
}

impl AnswerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, answer: impl Answer + 'static) -> Self {
        self.answers.push(Arc::new(answer));
        self
    }
}

#[async_trait]
impl Answer for AnswerList {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let mut requests = Vec::new();
        for answer in &self.answers {
            requests.extend(answer.build(update).await?);
        }
        debug!(answers = self.answers.len(), requests = requests.len(), "Answer list built");
        Ok(requests)
    }
}

/// Builder-style construction of decorator chains.
pub trait AnswerExt: Answer + Sized + 'static {
    fn with_text(self, text: impl Into<String>) -> TextAnswer {
        TextAnswer::new(self, text)
    }

    fn html(self) -> HtmlAnswer {
        HtmlAnswer::new(self)
    }

    fn to_sender(self) -> ToSender {
        ToSender::new(self)
    }

    fn to_chat(self, chat_id: i64) -> ToChatId {
        ToChatId::new(self, chat_id)
    }

    fn with_message_id(self) -> MessageIdAnswer {
        MessageIdAnswer::new(self)
    }

    fn edit_keyboard(self) -> KeyboardEditAnswer {
        KeyboardEditAnswer::new(self)
    }

    fn with_markup(self, keyboard: impl Keyboard + 'static) -> Markup {
        Markup::new(self, keyboard)
    }

    fn ack_callback(self) -> CallbackAck {
        CallbackAck::new(self)
    }
}

impl<T: Answer + Sized + 'static> AnswerExt for T {}

/// HTML text message addressed to the sender.
pub fn text_to_sender(text: impl Into<String>) -> ToSender {
    MessageAnswer.with_text(text).html().to_sender()
}
