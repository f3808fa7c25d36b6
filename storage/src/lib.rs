//! Storage crate: per-chat state, cached search context and the SQLite repositories.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`state_store`] – key-value StateStore (in-memory, Redis)
//! - [`user_state`] – UserStates (persisted UserStep)
//! - [`search_query`] – AyatSearchQuery (cached text search)
//! - [`models`] – Ayat, City, Podcast, Prayer, UserPrayer, User
//! - [`sqlite_pool`] – SqlitePoolManager and schema
//! - ayat, neighbor, prayer, podcast, user, city and admin-message repositories

mod admin_message_repo;
mod ayat_repo;
mod city_repo;
mod error;
mod models;
mod neighbor_ayats;
mod podcast_repo;
mod prayer_repo;
mod search_query;
mod sqlite_pool;
mod state_store;
mod user_repo;
mod user_state;

pub use admin_message_repo::AdminMessageRepository;
pub use ayat_repo::{AyatRepository, FavoriteAyatRepository};
pub use city_repo::CityRepository;
pub use error::StorageError;
pub use models::{
    Ayat, City, Podcast, PodcastReaction, Prayer, PrayerName, ReactionCounts, User, UserPrayer,
};
pub use neighbor_ayats::{
    neighbors_in, page_label, FavoriteNeighborAyats, NeighborAyats, Neighbors,
    PlainNeighborAyats, TextSearchNeighborAyats,
};
pub use podcast_repo::PodcastRepository;
pub use prayer_repo::PrayerRepository;
pub use search_query::AyatSearchQuery;
pub use sqlite_pool::SqlitePoolManager;
pub use state_store::{InMemoryStateStore, RedisStateStore, StateStore};
pub use user_repo::UserRepository;
pub use user_state::UserStates;
