//! Ayat lookups: by id, by sura/ayat numbers, by text, and the user's favorites.

use qbot_core::{BotError, Result};
use tracing::debug;

use crate::error::db_error;
use crate::models::Ayat;
use crate::sqlite_pool::SqlitePoolManager;

pub(crate) const AYAT_SELECT: &str = r#"
    SELECT
        a.ayat_id,
        a.sura_id AS sura_num,
        s.link AS sura_link,
        a.ayat_number AS ayat_num,
        a.arab_text,
        a.content,
        a.transliteration
    FROM ayats a
    INNER JOIN suras s ON a.sura_id = s.sura_id
"#;

const SURAS_COUNT: i64 = 114;

#[derive(Clone)]
pub struct AyatRepository {
    pool_manager: SqlitePoolManager,
}

impl AyatRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn by_id(&self, ayat_id: i64) -> Result<Ayat> {
        sqlx::query_as::<_, Ayat>(&format!("{AYAT_SELECT} WHERE a.ayat_id = ?"))
            .bind(ayat_id)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_error)?
            .ok_or_else(|| BotError::AyatNotFound(format!("id={}", ayat_id)))
    }

    /// Resolves "sura:ayat"; rows holding a range ("1-7") match every number inside it.
    pub async fn by_sura_ayat(&self, sura: i64, ayat: i64) -> Result<Ayat> {
        if !(1..=SURAS_COUNT).contains(&sura) {
            return Err(BotError::AyatNotFound(format!("sura {} out of range", sura)));
        }
        let ayats = sqlx::query_as::<_, Ayat>(&format!(
            "{AYAT_SELECT} WHERE a.sura_id = ? ORDER BY a.ayat_id"
        ))
        .bind(sura)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_error)?;

        ayats
            .into_iter()
            .find(|candidate| candidate.covers(ayat))
            .ok_or_else(|| BotError::AyatNotFound(format!("{}:{}", sura, ayat)))
    }

    /// Ayats whose translation contains `query` ignoring case, in id order.
    ///
    /// SQLite `LIKE` folds ASCII only, so matching runs on Unicode-lowercased text.
    pub async fn search_by_text(&self, query: &str) -> Result<Vec<Ayat>> {
        let needle = query.to_lowercase();
        let ayats = sqlx::query_as::<_, Ayat>(&format!("{AYAT_SELECT} ORDER BY a.ayat_id"))
            .fetch_all(self.pool_manager.pool())
            .await
            .map_err(db_error)?
            .into_iter()
            .filter(|ayat| ayat.content.to_lowercase().contains(&needle))
            .collect::<Vec<_>>();
        debug!(query = %query, found = ayats.len(), "Ayat text search");
        Ok(ayats)
    }

    pub async fn first(&self) -> Result<Ayat> {
        sqlx::query_as::<_, Ayat>(&format!("{AYAT_SELECT} ORDER BY a.ayat_id LIMIT 1"))
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_error)?
            .ok_or_else(|| BotError::AyatNotFound("no ayats loaded".to_string()))
    }
}

#[derive(Clone)]
pub struct FavoriteAyatRepository {
    pool_manager: SqlitePoolManager,
}

impl FavoriteAyatRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Favorites of the chat in id order.
    pub async fn favorites(&self, chat_id: i64) -> Result<Vec<Ayat>> {
        sqlx::query_as::<_, Ayat>(&format!(
            "{AYAT_SELECT} INNER JOIN favorite_ayats f ON f.ayat_id = a.ayat_id WHERE f.user_id = ? ORDER BY a.ayat_id"
        ))
        .bind(chat_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_error)
    }

    pub async fn is_favorite(&self, ayat_id: i64, chat_id: i64) -> Result<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM favorite_ayats WHERE ayat_id = ? AND user_id = ?")
                .bind(ayat_id)
                .bind(chat_id)
                .fetch_one(self.pool_manager.pool())
                .await
                .map_err(db_error)?;
        Ok(count > 0)
    }

    /// Adding an already-favorite ayat is a no-op.
    pub async fn add(&self, ayat_id: i64, chat_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO favorite_ayats (ayat_id, user_id) VALUES (?, ?)")
            .bind(ayat_id)
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn remove(&self, ayat_id: i64, chat_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM favorite_ayats WHERE ayat_id = ? AND user_id = ?")
            .bind(ayat_id)
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
