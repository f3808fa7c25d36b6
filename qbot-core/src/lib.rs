//! # qbot-core
//!
//! Core types and traits of the bot: [`Update`], [`Answer`], [`Keyboard`], the outbound
//! [`TgRequest`] descriptor, [`UserStep`] with its [`UserStateRepository`] seam, the
//! [`BotError`] taxonomy and tracing initialization. Transport- and storage-agnostic.

pub mod answer;
pub mod error;
pub mod logger;
pub mod types;
pub mod update;

pub use answer::{Answer, Endpoint, Keyboard, TgRequest};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{UserStateRepository, UserStep};
pub use update::{Coordinates, Update};

pub use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
