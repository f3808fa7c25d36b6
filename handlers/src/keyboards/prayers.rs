//! Per-user prayer marks of a day and the ✅/❌ keyboard over them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use qbot_core::{
    BotError, InlineKeyboardButton, InlineKeyboardMarkup, Keyboard, Result, Update,
};
use storage::{Prayer, PrayerName, PrayerRepository, UserPrayer, UserRepository};
use tracing::info;

const READ_EMOJI: &str = "✅";
const NOT_READ_EMOJI: &str = "❌";

/// Which day the prayer times refer to.
pub trait PrayerDate: Send + Sync {
    fn date(&self) -> NaiveDate;
}

/// The current local day.
#[derive(Debug, Clone, Copy, Default)]
pub struct Today;

impl PrayerDate for Today {
    fn date(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

impl PrayerDate for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

/// Prayer times of the user's city and the user's marks for them.
#[derive(Clone)]
pub struct UserPrayerTimes {
    prayers: PrayerRepository,
    users: UserRepository,
}

impl UserPrayerTimes {
    pub fn new(prayers: PrayerRepository, users: UserRepository) -> Self {
        Self { prayers, users }
    }

    /// The city's prayers of `day`. Fails with [`BotError::UserHasNoCity`] before any lookup
    /// when the user never chose a city.
    pub async fn prayers(&self, chat_id: i64, day: NaiveDate) -> Result<Vec<Prayer>> {
        let user = self.users.get(chat_id).await?;
        let city_id = user.city_id.ok_or(BotError::UserHasNoCity(chat_id))?;
        self.prayers.prayers_for(&city_id, day).await
    }

    /// The user's marks for the day, sunrise excluded, creating them on first access.
    /// A concurrent creation for the same user makes this one re-read instead.
    pub async fn get_or_create(&self, chat_id: i64, day: NaiveDate) -> Result<Vec<UserPrayer>> {
        let prayer_ids: Vec<i64> = self
            .prayers(chat_id, day)
            .await?
            .iter()
            .filter(|prayer| prayer.prayer_name() != Some(PrayerName::Sunrise))
            .map(|prayer| prayer.prayer_id)
            .collect();

        let existing = self.prayers.user_prayers(chat_id, &prayer_ids).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        match self.prayers.create_user_prayers(chat_id, &prayer_ids).await {
            Err(BotError::PrayersDoubled(_)) => {
                info!(chat_id, "User prayers created concurrently, re-reading");
                self.prayers.user_prayers(chat_id, &prayer_ids).await
            }
            other => other,
        }
    }
}

pub struct UserPrayersKeyboard {
    times: UserPrayerTimes,
    date: Arc<dyn PrayerDate>,
}

impl UserPrayersKeyboard {
    pub fn new(times: UserPrayerTimes, date: Arc<dyn PrayerDate>) -> Self {
        Self { times, date }
    }
}

#[async_trait]
impl Keyboard for UserPrayersKeyboard {
    async fn generate(&self, update: &Update) -> Result<InlineKeyboardMarkup> {
        let marks = self
            .times
            .get_or_create(update.chat_id()?, self.date.date())
            .await?;
        let row: Vec<InlineKeyboardButton> = marks
            .iter()
            .map(|mark| {
                if mark.is_read {
                    InlineKeyboardButton::callback(
                        READ_EMOJI,
                        format!("mark_not_readed({})", mark.prayer_at_user_id),
                    )
                } else {
                    InlineKeyboardButton::callback(
                        NOT_READ_EMOJI,
                        format!("mark_readed({})", mark.prayer_at_user_id),
                    )
                }
            })
            .collect();
        Ok(InlineKeyboardMarkup::new(vec![row]))
    }
}
