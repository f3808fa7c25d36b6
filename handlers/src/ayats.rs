//! Ayat answers: lookup by numbers, by id, by text search, favorites and the favorite toggle.
//!
//! Every ayat reply is the HTML ayat text with a pagination keyboard whose scope follows the
//! flow the user is in (all ayats, last search, favorites).

use std::sync::Arc;

use answer_chain::{text_to_sender, AnswerExt, Markup, MessageAnswer};
use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update};
use storage::{
    Ayat, AyatRepository, AyatSearchQuery, FavoriteAyatRepository, FavoriteNeighborAyats,
    NeighborAyats, PlainNeighborAyats, SqlitePoolManager, TextSearchNeighborAyats,
};
use tracing::debug;

use crate::callback::callback_argument;
use crate::keyboards::{AyatCallback, AyatPaginationKeyboard};

/// Ayat repositories and the three pagination scopes.
#[derive(Clone)]
pub struct AyatSources {
    ayats: AyatRepository,
    favorites: FavoriteAyatRepository,
    plain: Arc<dyn NeighborAyats>,
    search: Arc<dyn NeighborAyats>,
    favorite: Arc<dyn NeighborAyats>,
}

impl AyatSources {
    pub fn new(pool_manager: SqlitePoolManager, queries: AyatSearchQuery) -> Self {
        let ayats = AyatRepository::new(pool_manager.clone());
        let favorites = FavoriteAyatRepository::new(pool_manager.clone());
        Self {
            plain: Arc::new(PlainNeighborAyats::new(pool_manager)),
            search: Arc::new(TextSearchNeighborAyats::new(ayats.clone(), queries)),
            favorite: Arc::new(FavoriteNeighborAyats::new(favorites.clone())),
            ayats,
            favorites,
        }
    }

    pub fn ayats(&self) -> &AyatRepository {
        &self.ayats
    }

    fn keyboard(&self, ayat_id: i64, callback: AyatCallback) -> AyatPaginationKeyboard {
        let neighbors = match callback {
            AyatCallback::Plain => self.plain.clone(),
            AyatCallback::Search => self.search.clone(),
            AyatCallback::Favorite => self.favorite.clone(),
        };
        AyatPaginationKeyboard::new(ayat_id, neighbors, self.favorites.clone(), callback)
    }

    async fn reply(&self, ayat: &Ayat, callback: AyatCallback, update: &Update) -> Result<Vec<TgRequest>> {
        Markup::new(text_to_sender(ayat.text()), self.keyboard(ayat.ayat_id, callback))
            .build(update)
            .await
    }
}

/// "sura:ayat" typed as a message, e.g. `2:255`.
#[derive(Clone)]
pub struct AyatByNumbers {
    sources: AyatSources,
}

impl AyatByNumbers {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }

    fn parse(text: &str) -> Result<(i64, i64)> {
        text.trim()
            .split_once(':')
            .and_then(|(sura, ayat)| Some((sura.trim().parse().ok()?, ayat.trim().parse().ok()?)))
            .ok_or_else(|| BotError::AyatNotFound(format!("bad query {}", text)))
    }
}

#[async_trait]
impl Answer for AyatByNumbers {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let text = update
            .text()
            .ok_or_else(|| BotError::MalformedUpdate("message text missing".to_string()))?;
        let (sura, ayat) = Self::parse(text)?;
        let ayat = self.sources.ayats.by_sura_ayat(sura, ayat).await?;
        self.sources.reply(&ayat, AyatCallback::Plain, update).await
    }
}

/// `getAyat(id)` navigation over all ayats.
#[derive(Clone)]
pub struct AyatById {
    sources: AyatSources,
}

impl AyatById {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for AyatById {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let ayat = self.sources.ayats.by_id(callback_argument(update)?).await?;
        self.sources.reply(&ayat, AyatCallback::Plain, update).await
    }
}

/// First ayat whose translation contains the message text.
#[derive(Clone)]
pub struct SearchAyatByText {
    sources: AyatSources,
}

impl SearchAyatByText {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for SearchAyatByText {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let query = update
            .text()
            .ok_or_else(|| BotError::MalformedUpdate("message text missing".to_string()))?;
        let found = self.sources.ayats.search_by_text(query).await?;
        let first = found
            .first()
            .ok_or_else(|| BotError::AyatNotFound(format!("text '{}'", query)))?;
        debug!(query = %query, results = found.len(), "Ayat search answered");
        self.sources.reply(first, AyatCallback::Search, update).await
    }
}

/// `getSAyat(id)` navigation over the last search results.
#[derive(Clone)]
pub struct PaginateBySearch {
    sources: AyatSources,
}

impl PaginateBySearch {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for PaginateBySearch {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let ayat = self.sources.ayats.by_id(callback_argument(update)?).await?;
        self.sources.reply(&ayat, AyatCallback::Search, update).await
    }
}

/// First favorite ayat of the user.
#[derive(Clone)]
pub struct FavoriteAyats {
    sources: AyatSources,
}

impl FavoriteAyats {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for FavoriteAyats {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let favorites = self.sources.favorites.favorites(update.chat_id()?).await?;
        let first = favorites.first().ok_or(BotError::FavoritesEmpty)?;
        self.sources.reply(first, AyatCallback::Favorite, update).await
    }
}

/// `getFAyat(id)` navigation over favorites.
#[derive(Clone)]
pub struct FavoriteAyatPage {
    sources: AyatSources,
}

impl FavoriteAyatPage {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for FavoriteAyatPage {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let ayat = self.sources.ayats.by_id(callback_argument(update)?).await?;
        self.sources.reply(&ayat, AyatCallback::Favorite, update).await
    }
}

/// `addToFavor(id)` / `removeFromFavor(id)`: flips membership and edits the keyboard in place.
#[derive(Clone)]
pub struct ChangeFavorite {
    sources: AyatSources,
}

impl ChangeFavorite {
    pub fn new(sources: AyatSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl Answer for ChangeFavorite {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let ayat_id = callback_argument(update)?;
        let adding = update
            .callback_data()
            .is_some_and(|data| data.starts_with("addToFavor"));
        if adding {
            self.sources.favorites.add(ayat_id, chat_id).await?;
        } else {
            self.sources.favorites.remove(ayat_id, chat_id).await?;
        }
        debug!(chat_id, ayat_id, adding, "Favorite changed");

        MessageAnswer
            .with_markup(self.sources.keyboard(ayat_id, AyatCallback::Plain))
            .with_message_id()
            .edit_keyboard()
            .to_sender()
            .build(update)
            .await
    }
}
