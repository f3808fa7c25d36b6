//! Previous/next lookups for ayat pagination, in three scopes: all ayats, the chat's
//! favorites and the chat's last text search.

use async_trait::async_trait;
use qbot_core::{BotError, Result};

use crate::ayat_repo::{AyatRepository, FavoriteAyatRepository, AYAT_SELECT};
use crate::error::db_error;
use crate::models::Ayat;
use crate::search_query::AyatSearchQuery;
use crate::sqlite_pool::SqlitePoolManager;

/// Position of an ayat inside its pagination scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    pub left: Option<Ayat>,
    pub right: Option<Ayat>,
    /// "стр. N/M"
    pub page: String,
}

#[async_trait]
pub trait NeighborAyats: Send + Sync {
    /// Fails with [`BotError::AyatNotFound`] when `ayat_id` is not in the scope.
    async fn neighbors(&self, chat_id: i64, ayat_id: i64) -> Result<Neighbors>;
}

pub fn page_label(position: usize, total: usize) -> String {
    format!("стр. {}/{}", position, total)
}

/// Neighbors of `ayat_id` inside an ordered, already-loaded scope.
pub fn neighbors_in(ayats: &[Ayat], ayat_id: i64) -> Result<Neighbors> {
    let index = ayats
        .iter()
        .position(|ayat| ayat.ayat_id == ayat_id)
        .ok_or_else(|| BotError::AyatNotFound(format!("id={} not in page set", ayat_id)))?;
    Ok(Neighbors {
        left: index.checked_sub(1).map(|i| ayats[i].clone()),
        right: ayats.get(index + 1).cloned(),
        page: page_label(index + 1, ayats.len()),
    })
}

/// Every ayat in id order.
#[derive(Clone)]
pub struct PlainNeighborAyats {
    pool_manager: SqlitePoolManager,
}

impl PlainNeighborAyats {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    async fn adjacent(&self, condition: &str, ayat_id: i64) -> Result<Option<Ayat>> {
        sqlx::query_as::<_, Ayat>(&format!("{AYAT_SELECT} WHERE {condition} LIMIT 1"))
            .bind(ayat_id)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl NeighborAyats for PlainNeighborAyats {
    async fn neighbors(&self, _chat_id: i64, ayat_id: i64) -> Result<Neighbors> {
        let pool = self.pool_manager.pool();
        let (position,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ayats WHERE ayat_id <= ? AND EXISTS (SELECT 1 FROM ayats WHERE ayat_id = ?)",
        )
        .bind(ayat_id)
        .bind(ayat_id)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;
        if position == 0 {
            return Err(BotError::AyatNotFound(format!("id={}", ayat_id)));
        }
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ayats")
            .fetch_one(pool)
            .await
            .map_err(db_error)?;

        Ok(Neighbors {
            left: self
                .adjacent("a.ayat_id < ? ORDER BY a.ayat_id DESC", ayat_id)
                .await?,
            right: self
                .adjacent("a.ayat_id > ? ORDER BY a.ayat_id ASC", ayat_id)
                .await?,
            page: page_label(position as usize, total as usize),
        })
    }
}

/// The chat's favorites in id order.
#[derive(Clone)]
pub struct FavoriteNeighborAyats {
    favorites: FavoriteAyatRepository,
}

impl FavoriteNeighborAyats {
    pub fn new(favorites: FavoriteAyatRepository) -> Self {
        Self { favorites }
    }
}

#[async_trait]
impl NeighborAyats for FavoriteNeighborAyats {
    async fn neighbors(&self, chat_id: i64, ayat_id: i64) -> Result<Neighbors> {
        let favorites = self.favorites.favorites(chat_id).await?;
        neighbors_in(&favorites, ayat_id)
    }
}

/// Results of the chat's cached text search.
#[derive(Clone)]
pub struct TextSearchNeighborAyats {
    ayats: AyatRepository,
    queries: AyatSearchQuery,
}

impl TextSearchNeighborAyats {
    pub fn new(ayats: AyatRepository, queries: AyatSearchQuery) -> Self {
        Self { ayats, queries }
    }
}

#[async_trait]
impl NeighborAyats for TextSearchNeighborAyats {
    async fn neighbors(&self, chat_id: i64, ayat_id: i64) -> Result<Neighbors> {
        let query = self.queries.read(chat_id).await?;
        let found = self.ayats.search_by_text(&query).await?;
        neighbors_in(&found, ayat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ayats(ids: &[i64]) -> Vec<Ayat> {
        ids.iter()
            .map(|&id| Ayat {
                ayat_id: id,
                sura_num: 2,
                sura_link: "/sura/2".to_string(),
                ayat_num: id.to_string(),
                arab_text: String::new(),
                content: String::new(),
                transliteration: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_first_item() {
        let n = neighbors_in(&ayats(&[3, 8, 10, 11, 40]), 3).unwrap();
        assert_eq!(n.page, "стр. 1/5");
        assert!(n.left.is_none());
        assert_eq!(n.right.map(|a| a.ayat_id), Some(8));
    }

    #[test]
    fn test_last_item() {
        let n = neighbors_in(&ayats(&[3, 8, 10, 11, 40]), 40).unwrap();
        assert_eq!(n.page, "стр. 5/5");
        assert_eq!(n.left.map(|a| a.ayat_id), Some(11));
        assert!(n.right.is_none());
    }

    #[test]
    fn test_middle_item() {
        let n = neighbors_in(&ayats(&[3, 8, 10, 11, 40]), 10).unwrap();
        assert_eq!(n.page, "стр. 3/5");
    }

    #[test]
    fn test_missing_item() {
        assert!(matches!(
            neighbors_in(&ayats(&[3, 8, 10, 11, 40]), 9),
            Err(BotError::AyatNotFound(_))
        ));
        assert!(matches!(neighbors_in(&[], 1), Err(BotError::AyatNotFound(_))));
    }
}
