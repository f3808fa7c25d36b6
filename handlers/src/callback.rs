use qbot_core::{BotError, Result, Update};

/// Integer argument of callback data shaped like `name(42)`.
pub fn callback_argument(update: &Update) -> Result<i64> {
    let data = update
        .callback_data()
        .ok_or_else(|| BotError::MalformedUpdate("callback data missing".to_string()))?;
    data.split_once('(')
        .and_then(|(_, rest)| rest.rsplit_once(')'))
        .and_then(|(argument, _)| argument.trim().parse().ok())
        .ok_or_else(|| BotError::MalformedUpdate(format!("callback without id: {}", data)))
}
