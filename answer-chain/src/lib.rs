//! # answer-chain
//!
//! Composition of [`qbot_core::Answer`]s: the ordered guarded router ([`Fork`]), its
//! fallback wrapper ([`SafeFork`]) and the request-rewriting combinators.

pub mod combinators;
pub mod fork;
pub mod safe_fork;

pub use combinators::{
    text_to_sender, AnswerExt, AnswerList, CallbackAck, EmptyAnswer, HtmlAnswer, KeyboardEditAnswer, Markup,
    MessageAnswer, MessageIdAnswer, TextAnswer, ToChatId, ToSender,
};
pub use fork::{Fork, Guard, Routed, Router};
pub use safe_fork::{SafeFork, FALLBACK_TEXT};
