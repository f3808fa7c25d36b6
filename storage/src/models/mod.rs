//! Row models mapped from the SQLite tables.

mod ayat;
mod city;
mod podcast;
mod prayer;
mod user;

pub use ayat::Ayat;
pub use city::City;
pub use podcast::{Podcast, PodcastReaction, ReactionCounts};
pub use prayer::{Prayer, PrayerName, UserPrayer};
pub use user::User;
