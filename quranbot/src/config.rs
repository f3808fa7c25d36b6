//! Bot configuration loaded from the environment. Passed explicitly to whatever builds
//! the components; nothing reads the environment after startup.

use anyhow::{Context, Result};
use qbot_telegram::TelegramConfig;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://quranbot.db";
pub const DEFAULT_LOG_FILE: &str = "logs/quranbot.log";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// DATABASE_URL
    pub database_url: String,
    /// REDIS_URL; in-memory state store when unset
    pub redis_url: Option<String>,
    /// ADMIN_CHAT_IDS as given (comma-separated); see [`BotConfig::admin_chat_ids`]
    pub admin_chat_ids_raw: String,
    /// LOG_FILE
    pub log_file: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// POLL_TIMEOUT_SECS, long-poll timeout of the polling listener
    pub poll_timeout_secs: u64,
}

/// DATABASE_URL or [`DEFAULT_DATABASE_URL`].
pub fn database_url_from_env() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        let admin_chat_ids_raw = env::var("ADMIN_CHAT_IDS").unwrap_or_default();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

        Ok(Self {
            bot_token,
            database_url: database_url_from_env(),
            redis_url,
            admin_chat_ids_raw,
            log_file,
            telegram_api_url,
            poll_timeout_secs,
        })
    }

    /// Validate config: API URL must parse if set, admin ids must be integers.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        self.admin_chat_ids()?;
        Ok(())
    }

    /// Chats notified about new users.
    pub fn admin_chat_ids(&self) -> Result<Vec<i64>> {
        self.admin_chat_ids_raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse::<i64>()
                    .with_context(|| format!("ADMIN_CHAT_IDS contains a non-integer id: {}", id))
            })
            .collect()
    }

    pub fn telegram_config(&self) -> TelegramConfig {
        TelegramConfig::new(self.bot_token.clone(), self.telegram_api_url.clone())
    }
}
