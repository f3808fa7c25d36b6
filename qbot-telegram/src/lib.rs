//! # qbot-telegram
//!
//! Telegram Bot API layer: sends the [`qbot_core::TgRequest`]s an answer produced and
//! long-polls through teloxide's dispatcher, handing each update to the answer as raw JSON.
//! No routing or domain logic.

mod config;
mod runner;
mod sendable;

pub use config::{TelegramConfig, DEFAULT_API_URL};
pub use runner::{handle_update, raw_update, run_polling};
pub use sendable::{HttpSendable, Sendable, UnreachableSafeSendable};
