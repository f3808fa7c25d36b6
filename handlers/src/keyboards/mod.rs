//! Inline keyboards built from domain lookups.

mod ayat;
mod podcast;
mod prayers;
mod switch_inline;

pub use ayat::{AyatCallback, AyatPaginationKeyboard};
pub use podcast::PodcastKeyboard;
pub use prayers::{PrayerDate, Today, UserPrayerTimes, UserPrayersKeyboard};
pub use switch_inline::SwitchInlineQueryKeyboard;
