//! Podcast lookups and the like/dislike toggle.

use qbot_core::{BotError, Result};
use tracing::info;

use crate::error::db_error;
use crate::models::{Podcast, PodcastReaction, ReactionCounts};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PodcastRepository {
    pool_manager: SqlitePoolManager,
}

impl PodcastRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn by_id(&self, podcast_id: i64) -> Result<Podcast> {
        sqlx::query_as::<_, Podcast>(
            "SELECT podcast_id, telegram_file_id, link FROM podcasts WHERE podcast_id = ?",
        )
        .bind(podcast_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)?
        .ok_or_else(|| BotError::PodcastNotFound(format!("id={}", podcast_id)))
    }

    pub async fn random(&self) -> Result<Podcast> {
        sqlx::query_as::<_, Podcast>(
            "SELECT podcast_id, telegram_file_id, link FROM podcasts ORDER BY RANDOM() LIMIT 1",
        )
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)?
        .ok_or_else(|| BotError::PodcastNotFound("no podcasts loaded".to_string()))
    }

    pub async fn reaction_counts(&self, podcast_id: i64) -> Result<ReactionCounts> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(reaction = 'like'), 0),
                COALESCE(SUM(reaction = 'dislike'), 0)
            FROM podcast_reactions
            WHERE podcast_id = ?
            "#,
        )
        .bind(podcast_id)
        .fetch_one(self.pool_manager.pool())
        .await
        .map_err(db_error)?;
        Ok(ReactionCounts { likes, dislikes })
    }

    pub async fn reaction(&self, chat_id: i64, podcast_id: i64) -> Result<Option<PodcastReaction>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT reaction FROM podcast_reactions WHERE user_id = ? AND podcast_id = ?",
        )
        .bind(chat_id)
        .bind(podcast_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)?;
        Ok(row.and_then(|(reaction,)| PodcastReaction::parse(&reaction)))
    }

    /// Pressing the reaction the user already has removes it; pressing the other one
    /// replaces it. Returns the reaction left in place.
    pub async fn toggle_reaction(
        &self,
        chat_id: i64,
        podcast_id: i64,
        pressed: PodcastReaction,
    ) -> Result<Option<PodcastReaction>> {
        let mut tx = self.pool_manager.pool().begin().await.map_err(db_error)?;
        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT reaction FROM podcast_reactions WHERE user_id = ? AND podcast_id = ?",
        )
        .bind(chat_id)
        .bind(podcast_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let current = match existing.and_then(|(reaction,)| PodcastReaction::parse(&reaction)) {
            Some(reaction) if reaction == pressed => {
                sqlx::query("DELETE FROM podcast_reactions WHERE user_id = ? AND podcast_id = ?")
                    .bind(chat_id)
                    .bind(podcast_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error)?;
                None
            }
            Some(_) => {
                sqlx::query(
                    "UPDATE podcast_reactions SET reaction = ? WHERE user_id = ? AND podcast_id = ?",
                )
                .bind(pressed.as_str())
                .bind(chat_id)
                .bind(podcast_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
                Some(pressed)
            }
            None => {
                sqlx::query(
                    "INSERT INTO podcast_reactions (podcast_id, user_id, reaction) VALUES (?, ?, ?)",
                )
                .bind(podcast_id)
                .bind(chat_id)
                .bind(pressed.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
                Some(pressed)
            }
        };
        tx.commit().await.map_err(db_error)?;
        info!(chat_id, podcast_id, reaction = ?current, "Podcast reaction changed");
        Ok(current)
    }
}
