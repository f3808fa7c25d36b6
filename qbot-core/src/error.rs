use thiserror::Error;

/// Delivery error substrings that mean the user can no longer be reached.
const UNREACHABLE_USER_MARKERS: [&str; 3] = [
    "chat not found",
    "bot was blocked by the user",
    "user is deactivated",
];

#[derive(Error, Debug)]
pub enum BotError {
    /// No route wanted this update. Expected flow, recovered by `SafeFork`.
    #[error("Update not handled by any route")]
    Unhandled,

    #[error("Malformed update: {0}")]
    MalformedUpdate(String),

    #[error("Ayat not found: {0}")]
    AyatNotFound(String),

    #[error("City not supported")]
    CityNotSupported,

    #[error("Search query not found for chat {0}")]
    SearchQueryNotFound(i64),

    #[error("User {0} has no city")]
    UserHasNoCity(i64),

    #[error("User {0} already exists")]
    UserAlreadyExists(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Prayers doubled for user {0}")]
    PrayersDoubled(i64),

    #[error("Prayer times not found for city {city_id} on {day}")]
    PrayersNotFound { city_id: String, day: String },

    #[error("Favorite ayats list is empty")]
    FavoritesEmpty,

    #[error("Podcast not found: {0}")]
    PodcastNotFound(String),

    #[error("State store error: {0}")]
    State(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Telegram error: {0}")]
    Telegram(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BotError {
    /// Reply shown to the user for the domain-not-found family; `None` for real faults.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            BotError::AyatNotFound(_) => Some("Аят не найден"),
            BotError::CityNotSupported => Some("Этот город не поддерживается"),
            BotError::SearchQueryNotFound(_) => {
                Some("Контекст поиска устарел, нажмите \"Найти аят\" и повторите поиск")
            }
            BotError::FavoritesEmpty => Some("Вы еще не добавляли аятов в избранное"),
            BotError::PrayersNotFound { .. } => Some("Время намаза для вашего города не найдено"),
            BotError::PodcastNotFound(_) => Some("Подкаст не найден"),
            _ => None,
        }
    }

    /// True for delivery failures caused by a user who blocked the bot or disappeared.
    pub fn is_unreachable_user(&self) -> bool {
        match self {
            BotError::Telegram(body) => UNREACHABLE_USER_MARKERS
                .iter()
                .any(|marker| body.contains(marker)),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
