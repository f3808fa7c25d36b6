//! Long-polling runner on teloxide's dispatcher. Every update, whatever its kind, is
//! serialized back to its Bot API JSON and handed to the answer as a raw [`Update`].

use std::sync::Arc;
use std::time::Duration;

use qbot_core::{Answer, BotError, Result, Update};
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::{error, info, instrument};

use crate::sendable::Sendable;

/// Raw JSON view of an update received through teloxide.
pub fn raw_update(update: &teloxide::types::Update) -> Result<Update> {
    Ok(Update::new(serde_json::to_string(update)?))
}

/// Builds the answer for one update and sends it. An unhandled update is logged and
/// dropped; other failures are returned to the caller.
#[instrument(skip(answer, sendable, update), fields(update_id = update.update_id()))]
pub async fn handle_update(
    answer: &dyn Answer,
    sendable: &dyn Sendable,
    update: Update,
) -> Result<()> {
    let requests = match answer.build(&update).await {
        Ok(requests) => requests,
        Err(BotError::Unhandled) => {
            info!("Update not handled by any route");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    if requests.is_empty() {
        return Ok(());
    }
    sendable.send(&requests).await?;
    Ok(())
}

/// Polls with the given long-poll timeout until Ctrl-C. Updates of one chat are handled
/// in order; different chats run concurrently.
pub async fn run_polling(
    bot: Bot,
    poll_timeout: Duration,
    answer: Arc<dyn Answer>,
    sendable: Arc<dyn Sendable>,
) {
    let listener = Polling::builder(bot.clone()).timeout(poll_timeout).build();
    let handler = dptree::endpoint(
        |update: teloxide::types::Update,
         answer: Arc<dyn Answer>,
         sendable: Arc<dyn Sendable>| async move {
            match raw_update(&update) {
                Ok(raw) => {
                    if let Err(e) = handle_update(answer.as_ref(), sendable.as_ref(), raw).await {
                        error!(error = %e, "Update handling failed");
                    }
                }
                Err(e) => error!(error = %e, "Update could not be serialized"),
            }
            respond(())
        },
    );

    info!(timeout_secs = poll_timeout.as_secs(), "Long polling started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![answer, sendable])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
    info!("Long polling stopped");
}
