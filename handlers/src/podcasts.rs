//! Podcasts: a random or requested episode, and the like/dislike toggle.

use answer_chain::{AnswerExt, MessageAnswer};
use async_trait::async_trait;
use qbot_core::{Answer, BotError, Endpoint, Keyboard, Result, TgRequest, Update};
use storage::{Podcast, PodcastReaction, PodcastRepository};
use tracing::debug;

use crate::callback::callback_argument;
use crate::keyboards::PodcastKeyboard;

/// Which episode a [`PodcastAnswer`] sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodcastChoice {
    /// Any episode; the caption carries its `/podcastN` command for sharing.
    Random,
    /// The episode named by a `/podcastN` message.
    FromCommand,
}

/// Sends one episode with its reaction keyboard: the uploaded audio when Telegram already
/// has it, otherwise the link as text.
#[derive(Clone)]
pub struct PodcastAnswer {
    podcasts: PodcastRepository,
    choice: PodcastChoice,
}

impl PodcastAnswer {
    pub fn random(podcasts: PodcastRepository) -> Self {
        Self {
            podcasts,
            choice: PodcastChoice::Random,
        }
    }

    pub fn concrete(podcasts: PodcastRepository) -> Self {
        Self {
            podcasts,
            choice: PodcastChoice::FromCommand,
        }
    }

    async fn podcast(&self, update: &Update) -> Result<Podcast> {
        match self.choice {
            PodcastChoice::Random => self.podcasts.random().await,
            PodcastChoice::FromCommand => self.podcasts.by_id(podcast_command_id(update)?).await,
        }
    }
}

fn podcast_command_id(update: &Update) -> Result<i64> {
    let text = update.text().unwrap_or_default();
    text.trim()
        .strip_prefix("/podcast")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| BotError::PodcastNotFound(text.to_string()))
}

#[async_trait]
impl Answer for PodcastAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let podcast = self.podcast(update).await?;
        debug!(podcast_id = podcast.podcast_id, choice = ?self.choice, "Podcast chosen");

        let request = match &podcast.telegram_file_id {
            Some(file_id) => {
                let audio = TgRequest::new(Endpoint::SendAudio).with_param("audio", file_id.as_str());
                match self.choice {
                    PodcastChoice::Random => {
                        audio.with_param("caption", format!("/podcast{}", podcast.podcast_id))
                    }
                    PodcastChoice::FromCommand => audio,
                }
            }
            None => TgRequest::send_message().with_text(podcast.link.as_str()),
        };
        let markup = PodcastKeyboard::new(podcast.podcast_id, self.podcasts.clone())
            .generate(update)
            .await?;
        Ok(vec![request.with_chat_id(update.chat_id()?).with_markup(&markup)?])
    }
}

/// `like(N)` / `dislike(N)`: toggles the user's reaction and redraws the totals in place.
#[derive(Clone)]
pub struct PodcastReactionChange {
    podcasts: PodcastRepository,
}

impl PodcastReactionChange {
    pub fn new(podcasts: PodcastRepository) -> Self {
        Self { podcasts }
    }
}

#[async_trait]
impl Answer for PodcastReactionChange {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let podcast_id = callback_argument(update)?;
        let pressed = match update.callback_data() {
            Some(data) if data.starts_with("dislike") => PodcastReaction::Dislike,
            _ => PodcastReaction::Like,
        };
        self.podcasts.by_id(podcast_id).await?;
        self.podcasts
            .toggle_reaction(chat_id, podcast_id, pressed)
            .await?;

        MessageAnswer
            .with_markup(PodcastKeyboard::new(podcast_id, self.podcasts.clone()))
            .with_message_id()
            .edit_keyboard()
            .to_sender()
            .build(update)
            .await
    }
}
