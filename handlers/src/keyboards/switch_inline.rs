use async_trait::async_trait;
use qbot_core::{InlineKeyboardButton, InlineKeyboardMarkup, Keyboard, Result, Update};

/// Single button that opens inline city search in the current chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchInlineQueryKeyboard;

#[async_trait]
impl Keyboard for SwitchInlineQueryKeyboard {
    async fn generate(&self, _update: &Update) -> Result<InlineKeyboardMarkup> {
        Ok(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::switch_inline_query_current_chat("Поиск города", ""),
        ]]))
    }
}
