//! Prayer times answers: the day's times with read marks, toggling a mark, and the
//! invitation to choose a city.

use std::sync::Arc;

use answer_chain::{text_to_sender, AnswerExt, Markup, MessageAnswer};
use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update, UserStateRepository, UserStep};
use storage::{Prayer, PrayerRepository};
use tracing::{info, instrument};

use crate::callback::callback_argument;
use crate::keyboards::{PrayerDate, SwitchInlineQueryKeyboard, UserPrayerTimes, UserPrayersKeyboard};

const TIME_FORMAT: &str = "%H:%M";

/// Text shown to a user who asked for prayer times without choosing a city.
pub const INVITE_SET_CITY_TEXT: &str =
    "Вы не указали город, отправьте местоположение или воспользуйтесь поиском";

fn prayer_times_text(prayers: &[Prayer]) -> String {
    let Some(first) = prayers.first() else {
        return String::new();
    };
    let mut text = format!(
        "Время намаза для г. {} ({})\n",
        first.city_name,
        first.day.format("%d.%m.%Y")
    );
    for prayer in prayers {
        let title = prayer
            .prayer_name()
            .map(|name| name.title())
            .unwrap_or(prayer.name.as_str());
        text.push_str(&format!("\n{}: {}", title, prayer.time.format(TIME_FORMAT)));
    }
    text
}

/// "Время намаза": the city's times for the day plus the user's read-mark keyboard.
#[derive(Clone)]
pub struct PrayerTimeAnswer {
    times: UserPrayerTimes,
    date: Arc<dyn PrayerDate>,
}

impl PrayerTimeAnswer {
    pub fn new(times: UserPrayerTimes, date: Arc<dyn PrayerDate>) -> Self {
        Self { times, date }
    }
}

#[async_trait]
impl Answer for PrayerTimeAnswer {
    #[instrument(skip(self, update))]
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let prayers = self.times.prayers(update.chat_id()?, self.date.date()).await?;
        Markup::new(
            text_to_sender(prayer_times_text(&prayers)),
            UserPrayersKeyboard::new(self.times.clone(), self.date.clone()),
        )
        .build(update)
        .await
    }
}

/// Recovers [`BotError::UserHasNoCity`]: moves the chat to city search and invites the user
/// to pick a city.
#[derive(Clone)]
pub struct InviteSetCity {
    origin: Arc<dyn Answer>,
    states: Arc<dyn UserStateRepository>,
}

impl InviteSetCity {
    pub fn new(origin: impl Answer + 'static, states: Arc<dyn UserStateRepository>) -> Self {
        Self {
            origin: Arc::new(origin),
            states,
        }
    }
}

#[async_trait]
impl Answer for InviteSetCity {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match self.origin.build(update).await {
            Err(BotError::UserHasNoCity(chat_id)) => {
                info!(chat_id, "User has no city, inviting to choose one");
                self.states.change_step(chat_id, UserStep::CitySearch).await?;
                text_to_sender(INVITE_SET_CITY_TEXT)
                    .with_markup(SwitchInlineQueryKeyboard)
                    .build(update)
                    .await
            }
            other => other,
        }
    }
}

/// `mark_readed(id)` / `mark_not_readed(id)`: flips one mark and edits the keyboard of that day.
#[derive(Clone)]
pub struct UserPrayerStatusChange {
    prayers: PrayerRepository,
    times: UserPrayerTimes,
}

impl UserPrayerStatusChange {
    pub fn new(prayers: PrayerRepository, times: UserPrayerTimes) -> Self {
        Self { prayers, times }
    }
}

#[async_trait]
impl Answer for UserPrayerStatusChange {
    #[instrument(skip(self, update))]
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let mark_id = callback_argument(update)?;
        let is_read = update
            .callback_data()
            .is_some_and(|data| data.starts_with("mark_readed"));

        self.prayers.change_status(mark_id, chat_id, is_read).await?;
        let day = self.prayers.day_of_user_prayer(mark_id).await?;
        info!(chat_id, mark_id, is_read, "Prayer mark changed");

        MessageAnswer
            .with_markup(UserPrayersKeyboard::new(self.times.clone(), Arc::new(day)))
            .with_message_id()
            .edit_keyboard()
            .to_sender()
            .build(update)
            .await
    }
}
