//! `/start` registration and `/help`.

use std::sync::Arc;

use answer_chain::{text_to_sender, AnswerExt, AnswerList};
use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update};
use storage::{AdminMessageRepository, AyatRepository, UserRepository};
use tracing::{debug, info};

pub const NEW_USER_ADMIN_TEXT: &str = "Зарегистрировался новый пользователь";
pub const ALREADY_REGISTERED_TEXT: &str = "Вы уже зарегистрированы";
pub const REFERRER_NOTICE_TEXT: &str = "По вашей реферальной ссылке произошла регистрация";

/// Registers the chat, sends the start message and the first ayat, and notifies admins.
/// A referral link (`/start <chat id>` of a registered user) is stored on the new user and
/// the referrer is told about the registration; an unknown referrer is ignored.
/// Fails with [`BotError::UserAlreadyExists`] for a known chat.
#[derive(Clone)]
pub struct StartAnswer {
    users: UserRepository,
    admin_messages: AdminMessageRepository,
    ayats: AyatRepository,
    admin_chat_ids: Arc<Vec<i64>>,
}

impl StartAnswer {
    pub fn new(
        users: UserRepository,
        admin_messages: AdminMessageRepository,
        ayats: AyatRepository,
        admin_chat_ids: Vec<i64>,
    ) -> Self {
        Self {
            users,
            admin_messages,
            ayats,
            admin_chat_ids: Arc::new(admin_chat_ids),
        }
    }

    async fn referrer(&self, update: &Update) -> Result<Option<i64>> {
        let candidate = update
            .text()
            .and_then(|text| text.trim().strip_prefix("/start"))
            .and_then(|argument| argument.trim().parse::<i64>().ok());
        match candidate {
            Some(referrer) if self.users.exists(referrer).await? => Ok(Some(referrer)),
            Some(referrer) => {
                debug!(referrer, "Unknown referrer ignored");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Answer for StartAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        if self.users.exists(chat_id).await? {
            return Err(BotError::UserAlreadyExists(chat_id));
        }
        let start_message = self.admin_messages.get("start").await?;
        let first_ayat = self.ayats.first().await?;
        let referrer = self.referrer(update).await?;
        self.users.create(chat_id, referrer).await?;
        info!(chat_id, referrer, "New user started the bot");

        let mut answers = AnswerList::new()
            .push(text_to_sender(start_message))
            .push(text_to_sender(first_ayat.text()));
        if let Some(referrer) = referrer {
            answers = answers.push(text_to_sender(REFERRER_NOTICE_TEXT).to_chat(referrer));
        }
        for admin in self.admin_chat_ids.iter() {
            answers = answers.push(text_to_sender(NEW_USER_ADMIN_TEXT).to_chat(*admin));
        }
        answers.build(update).await
    }
}

/// Recovers [`BotError::UserAlreadyExists`]: reactivates an inactive user, otherwise tells
/// the user they are already registered.
#[derive(Clone)]
pub struct UserAlreadyExistsAnswer {
    origin: Arc<dyn Answer>,
    users: UserRepository,
}

impl UserAlreadyExistsAnswer {
    pub fn new(origin: impl Answer + 'static, users: UserRepository) -> Self {
        Self {
            origin: Arc::new(origin),
            users,
        }
    }
}

#[async_trait]
impl Answer for UserAlreadyExistsAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match self.origin.build(update).await {
            Err(BotError::UserAlreadyExists(chat_id)) => {
                let user = self.users.get(chat_id).await?;
                if user.is_active {
                    return text_to_sender(ALREADY_REGISTERED_TEXT).build(update).await;
                }
                self.users.set_active(chat_id, true).await?;
                info!(chat_id, "User reactivated");
                text_to_sender(format!(
                    "Рады видеть вас снова, вы продолжите с дня {}",
                    user.day
                ))
                .build(update)
                .await
            }
            other => other,
        }
    }
}

/// `/help`: the stored help text.
#[derive(Clone)]
pub struct HelpAnswer {
    admin_messages: AdminMessageRepository,
}

impl HelpAnswer {
    pub fn new(admin_messages: AdminMessageRepository) -> Self {
        Self { admin_messages }
    }
}

#[async_trait]
impl Answer for HelpAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let text = self.admin_messages.get("help").await?;
        text_to_sender(text).build(update).await
    }
}
