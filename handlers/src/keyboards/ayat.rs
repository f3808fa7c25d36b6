//! Ayat navigation: previous/next within the current scope, the page label and the
//! favorite toggle.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{InlineKeyboardButton, InlineKeyboardMarkup, Keyboard, Result, Update};
use storage::{Ayat, FavoriteAyatRepository, NeighborAyats};

/// Callback each navigation button carries, by pagination scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AyatCallback {
    /// All ayats: `getAyat(id)`
    Plain,
    /// Last text search: `getSAyat(id)`
    Search,
    /// Favorites: `getFAyat(id)`
    Favorite,
}

impl AyatCallback {
    pub fn data(&self, ayat_id: i64) -> String {
        match self {
            AyatCallback::Plain => format!("getAyat({})", ayat_id),
            AyatCallback::Search => format!("getSAyat({})", ayat_id),
            AyatCallback::Favorite => format!("getFAyat({})", ayat_id),
        }
    }
}

pub struct AyatPaginationKeyboard {
    ayat_id: i64,
    neighbors: Arc<dyn NeighborAyats>,
    favorites: FavoriteAyatRepository,
    callback: AyatCallback,
}

impl AyatPaginationKeyboard {
    pub fn new(
        ayat_id: i64,
        neighbors: Arc<dyn NeighborAyats>,
        favorites: FavoriteAyatRepository,
        callback: AyatCallback,
    ) -> Self {
        Self {
            ayat_id,
            neighbors,
            favorites,
            callback,
        }
    }

    fn label(ayat: &Ayat) -> String {
        format!("{}:{}", ayat.sura_num, ayat.ayat_num)
    }
}

#[async_trait]
impl Keyboard for AyatPaginationKeyboard {
    async fn generate(&self, update: &Update) -> Result<InlineKeyboardMarkup> {
        let chat_id = update.chat_id()?;
        let neighbors = self.neighbors.neighbors(chat_id, self.ayat_id).await?;

        let mut navigation = Vec::with_capacity(3);
        if let Some(left) = &neighbors.left {
            navigation.push(InlineKeyboardButton::callback(
                format!("<- {}", Self::label(left)),
                self.callback.data(left.ayat_id),
            ));
        }
        navigation.push(InlineKeyboardButton::callback(neighbors.page, "fake"));
        if let Some(right) = &neighbors.right {
            navigation.push(InlineKeyboardButton::callback(
                format!("{} ->", Self::label(right)),
                self.callback.data(right.ayat_id),
            ));
        }

        let favorite = if self.favorites.is_favorite(self.ayat_id, chat_id).await? {
            InlineKeyboardButton::callback(
                "Удалить из избранного",
                format!("removeFromFavor({})", self.ayat_id),
            )
        } else {
            InlineKeyboardButton::callback(
                "Добавить в избранное",
                format!("addToFavor({})", self.ayat_id),
            )
        };

        Ok(InlineKeyboardMarkup::new(vec![navigation, vec![favorite]]))
    }
}
