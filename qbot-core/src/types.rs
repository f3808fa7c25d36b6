//! Conversation state shared between the router, the decorators and storage.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{BotError, Result};

/// Per-chat conversation step. A chat with no stored step is in [`UserStep::Nothing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserStep {
    #[default]
    Nothing,
    AyatSearch,
    CitySearch,
}

impl UserStep {
    pub const ALL: [UserStep; 3] = [UserStep::Nothing, UserStep::AyatSearch, UserStep::CitySearch];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStep::Nothing => "nothing",
            UserStep::AyatSearch => "ayat_search",
            UserStep::CitySearch => "city_search",
        }
    }
}

impl fmt::Display for UserStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStep {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nothing" => Ok(UserStep::Nothing),
            "ayat_search" => Ok(UserStep::AyatSearch),
            "city_search" => Ok(UserStep::CitySearch),
            other => Err(BotError::State(format!("unknown user step: {}", other))),
        }
    }
}

/// Persisted per-chat step. Implemented by the storage layer.
#[async_trait]
pub trait UserStateRepository: Send + Sync {
    /// Current step; absence of a stored value means [`UserStep::Nothing`].
    async fn step(&self, chat_id: i64) -> Result<UserStep>;

    /// Overwrites the step for the chat.
    async fn change_step(&self, chat_id: i64, step: UserStep) -> Result<()>;
}
