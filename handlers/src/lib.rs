//! # Handlers for quranbot
//!
//! Domain answers (ayats, favorites, prayer times, city, podcasts, start/help/status) and
//! the keyboards they attach.

mod ayats;
mod callback;
mod city;
pub mod keyboards;
mod podcasts;
mod prayers;
mod start;
mod status;

#[cfg(test)]
mod test;

pub use ayats::{
    AyatById, AyatByNumbers, AyatSources, ChangeFavorite, FavoriteAyatPage, FavoriteAyats,
    PaginateBySearch, SearchAyatByText,
};
pub use callback::callback_argument;
pub use city::{ChangeCity, InlineCityQuery};
pub use keyboards::{PodcastKeyboard, SwitchInlineQueryKeyboard, Today, UserPrayerTimes};
pub use podcasts::{PodcastAnswer, PodcastChoice, PodcastReactionChange};
pub use prayers::{InviteSetCity, PrayerTimeAnswer, UserPrayerStatusChange, INVITE_SET_CITY_TEXT};
pub use start::{
    HelpAnswer, StartAnswer, UserAlreadyExistsAnswer, ALREADY_REGISTERED_TEXT,
    NEW_USER_ADMIN_TEXT, REFERRER_NOTICE_TEXT,
};
pub use status::StatusAnswer;
