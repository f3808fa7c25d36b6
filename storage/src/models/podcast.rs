//! Podcast episodes and the listeners' reactions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Podcast {
    pub podcast_id: i64,
    /// Id of an audio already uploaded to Telegram; `None` until the first upload.
    pub telegram_file_id: Option<String>,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodcastReaction {
    Like,
    Dislike,
}

impl PodcastReaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodcastReaction::Like => "like",
            PodcastReaction::Dislike => "dislike",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(PodcastReaction::Like),
            "dislike" => Some(PodcastReaction::Dislike),
            _ => None,
        }
    }
}

/// Like and dislike totals shown on the podcast keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    pub likes: i64,
    pub dislikes: i64,
}
