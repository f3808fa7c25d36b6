//! The bot's route table.
//!
//! Button texts and commands come first, then callbacks and inline queries, then the
//! step-gated free text of the two search flows. A button press therefore always wins
//! over an unfinished search. Every button press is acknowledged with
//! `answerCallbackQuery` after its answer.

use std::sync::Arc;

use anyhow::Result;
use answer_chain::{text_to_sender, AnswerExt, EmptyAnswer, Fork, Guard, SafeFork};
use async_trait::async_trait;
use decorators::{CachedSearchQuery, ChangeState, ResetState, StepGate, UserFacingSafe};
use handlers::{
    AyatById, AyatByNumbers, AyatSources, ChangeCity, ChangeFavorite, FavoriteAyatPage,
    FavoriteAyats, HelpAnswer, InlineCityQuery, InviteSetCity, PaginateBySearch, PodcastAnswer,
    PodcastReactionChange, PrayerTimeAnswer, SearchAyatByText, StartAnswer, StatusAnswer,
    SwitchInlineQueryKeyboard, Today, UserAlreadyExistsAnswer, UserPrayerStatusChange,
    UserPrayerTimes,
};
use qbot_core::{Answer, TgRequest, Update, UserStep};
use storage::{
    AdminMessageRepository, AyatRepository, CityRepository, PodcastRepository, PrayerRepository,
    UserRepository,
};
use tracing::info;

use crate::components::BotComponents;

pub const SEARCH_PROMPT_TEXT: &str = "Введите слово для поиска:";
pub const CHANGE_CITY_TEXT: &str = "Отправьте местоположение или воспользуйтесь поиском";

/// Root answer of the bot: the route table behind the fallback and the user-facing
/// recovery of domain not-found errors.
pub struct QuranbotAnswer {
    origin: UserFacingSafe,
}

impl QuranbotAnswer {
    pub fn new(components: &BotComponents) -> Result<Self> {
        let pool = &components.pool_manager;
        let states = components.states.clone();
        let sources = AyatSources::new(pool.clone(), components.queries.clone());
        let users = UserRepository::new(pool.clone());
        let cities = CityRepository::new(pool.clone());
        let admin_messages = AdminMessageRepository::new(pool.clone());
        let prayers = PrayerRepository::new(pool.clone());
        let times = UserPrayerTimes::new(prayers.clone(), users.clone());
        let change_city = ChangeCity::new(cities.clone(), users.clone(), states.clone());
        let podcasts = PodcastRepository::new(pool.clone());

        let fork = Fork::new(states.clone())
            .route(
                Guard::message_text(r"^(🎧 )?Подкасты$")?,
                PodcastAnswer::random(podcasts.clone()),
            )
            .route(
                Guard::message_text(r"^/podcast\d+$")?,
                PodcastAnswer::concrete(podcasts.clone()),
            )
            .route(
                Guard::message_text(r"^/start")?,
                UserAlreadyExistsAnswer::new(
                    StartAnswer::new(
                        users.clone(),
                        admin_messages.clone(),
                        AyatRepository::new(pool.clone()),
                        components.admin_chat_ids.clone(),
                    ),
                    users.clone(),
                ),
            )
            .route(Guard::message_text(r"^/help$")?, HelpAnswer::new(admin_messages))
            .route(
                Guard::message_text(r"^/status$")?,
                StatusAnswer::new(users.clone(), states.clone()),
            )
            .route(
                Guard::message_text(r"^Найти аят$")?,
                ChangeState::new(
                    text_to_sender(SEARCH_PROMPT_TEXT),
                    states.clone(),
                    UserStep::AyatSearch,
                ),
            )
            .route(
                Guard::message_text(r"^\d+:\d+$")?,
                AyatByNumbers::new(sources.clone()),
            )
            .route(
                Guard::message_text(r"^Избранное$")?,
                FavoriteAyats::new(sources.clone()),
            )
            .route(
                Guard::message_text(r"^Время намаза$")?,
                InviteSetCity::new(
                    PrayerTimeAnswer::new(times.clone(), Arc::new(Today)),
                    states.clone(),
                ),
            )
            .route(
                Guard::message_text(r"^Поменять город$")?,
                ChangeState::new(
                    text_to_sender(CHANGE_CITY_TEXT).with_markup(SwitchInlineQueryKeyboard),
                    states.clone(),
                    UserStep::CitySearch,
                ),
            )
            .route(
                Guard::callback_data(r"^getAyat\(\d+\)$")?,
                AyatById::new(sources.clone()).ack_callback(),
            )
            .route(
                Guard::callback_data(r"^getSAyat\(\d+\)$")?,
                PaginateBySearch::new(sources.clone()).ack_callback(),
            )
            .route(
                Guard::callback_data(r"^getFAyat\(\d+\)$")?,
                FavoriteAyatPage::new(sources.clone()).ack_callback(),
            )
            .route(
                Guard::callback_data(r"^(addToFavor|removeFromFavor)\(\d+\)$")?,
                ChangeFavorite::new(sources.clone()).ack_callback(),
            )
            .route(
                Guard::callback_data(r"^mark_(not_)?readed\(\d+\)$")?,
                UserPrayerStatusChange::new(prayers, times).ack_callback(),
            )
            .route(
                Guard::callback_data(r"^(like|dislike)\(\d+\)$")?,
                ResetState::new(PodcastReactionChange::new(podcasts), states.clone())
                    .ack_callback(),
            )
            .route(Guard::callback_data(r"^fake$")?, EmptyAnswer.ack_callback())
            .route(Guard::inline_query(), InlineCityQuery::new(cities))
            .route(
                Guard::location(),
                StepGate::new(UserStep::CitySearch, change_city.clone(), states.clone()),
            )
            .route(Guard::message().in_step(UserStep::CitySearch), change_city)
            .route(
                Guard::message().in_step(UserStep::AyatSearch),
                CachedSearchQuery::new(
                    SearchAyatByText::new(sources),
                    components.queries.clone(),
                ),
            );
        info!(routes = fork.len(), "Route table built");

        Ok(Self {
            origin: UserFacingSafe::new(SafeFork::new(fork)),
        })
    }
}

#[async_trait]
impl Answer for QuranbotAnswer {
    async fn build(&self, update: &Update) -> qbot_core::Result<Vec<TgRequest>> {
        self.origin.build(update).await
    }
}
