//! Bot API connection settings: token and API base URL.

use qbot_core::{BotError, Result};
use teloxide::Bot;

/// Public Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Minimal Telegram connection config, derived from the application config.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_url: String,
}

impl TelegramConfig {
    /// `api_url` overrides [`DEFAULT_API_URL`] (local Bot API server, test server).
    pub fn new(bot_token: impl Into<String>, api_url: Option<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self::new(bot_token, None)
    }

    /// teloxide client for polling, pointed at the same API server.
    pub fn bot(&self) -> Result<Bot> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| BotError::Config(format!("invalid Telegram API URL {}: {}", self.api_url, e)))?;
        Ok(Bot::new(self.bot_token.clone()).set_api_url(url))
    }

    /// `{api}/bot{token}/{method}`
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }
}
