//! Like/dislike buttons under a podcast, with the current totals.

use async_trait::async_trait;
use qbot_core::{InlineKeyboardButton, InlineKeyboardMarkup, Keyboard, Result, Update};
use storage::PodcastRepository;

pub struct PodcastKeyboard {
    podcast_id: i64,
    podcasts: PodcastRepository,
}

impl PodcastKeyboard {
    pub fn new(podcast_id: i64, podcasts: PodcastRepository) -> Self {
        Self {
            podcast_id,
            podcasts,
        }
    }
}

#[async_trait]
impl Keyboard for PodcastKeyboard {
    async fn generate(&self, _update: &Update) -> Result<InlineKeyboardMarkup> {
        let counts = self.podcasts.reaction_counts(self.podcast_id).await?;
        Ok(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback(
                format!("👍 {}", counts.likes),
                format!("like({})", self.podcast_id),
            ),
            InlineKeyboardButton::callback(
                format!("👎 {}", counts.dislikes),
                format!("dislike({})", self.podcast_id),
            ),
        ]]))
    }
}
