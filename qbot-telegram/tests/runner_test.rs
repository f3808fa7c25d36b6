//! Integration tests for the teloxide update conversion and per-update handling.

use std::sync::Mutex;

use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update};
use qbot_telegram::{handle_update, raw_update, Sendable};
use serde_json::Value;

struct EchoAnswer;

#[async_trait]
impl Answer for EchoAnswer {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match update.text() {
            Some("unknown") => Err(BotError::Unhandled),
            Some("silent") => Ok(Vec::new()),
            Some(text) => Ok(vec![TgRequest::send_message()
                .with_chat_id(update.chat_id()?)
                .with_text(text)]),
            None => Err(BotError::MalformedUpdate("no text".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingSendable {
    sent: Mutex<Vec<TgRequest>>,
}

#[async_trait]
impl Sendable for RecordingSendable {
    async fn send(&self, requests: &[TgRequest]) -> Result<Vec<Value>> {
        self.sent.lock().unwrap().extend_from_slice(requests);
        Ok(Vec::new())
    }
}

fn text_update(text: &str) -> Update {
    Update::new(format!(
        r#"{{"update_id":10,"message":{{"message_id":1,"text":"{}","chat":{{"id":905}}}}}}"#,
        text
    ))
}

/// **Test: A message received through teloxide keeps its Bot API shape.**
///
/// **Setup:** A private-chat text message decoded as a teloxide update.
/// **Action:** `raw_update`.
/// **Expected:** Update id, chat id, message id and text read back from the raw JSON.
#[test]
fn test_raw_update_from_message() {
    let update: teloxide::types::Update = serde_json::from_str(
        r#"{"update_id":7,"message":{"message_id":4,"date":1760600000,
            "chat":{"id":905,"type":"private","first_name":"Алмаз"},
            "from":{"id":905,"is_bot":false,"first_name":"Алмаз"},
            "text":"1:1"}}"#,
    )
    .unwrap();

    let raw = raw_update(&update).unwrap();

    assert_eq!(raw.update_id(), Some(7));
    assert_eq!(raw.chat_id().unwrap(), 905);
    assert_eq!(raw.message_id().unwrap(), 4);
    assert_eq!(raw.text(), Some("1:1"));
}

/// **Test: A button press received through teloxide keeps its data, id and message.**
#[test]
fn test_raw_update_from_callback_query() {
    let update: teloxide::types::Update = serde_json::from_str(
        r#"{"update_id":8,"callback_query":{"id":"4382bfdwdsb323b2d9",
            "from":{"id":905,"is_bot":false,"first_name":"Алмаз"},
            "chat_instance":"-8563585384798880073","data":"like(5)",
            "message":{"message_id":17,"date":1760600000,
                "chat":{"id":905,"type":"private","first_name":"Алмаз"},"text":"/podcast5"}}}"#,
    )
    .unwrap();

    let raw = raw_update(&update).unwrap();

    assert_eq!(raw.callback_data(), Some("like(5)"));
    assert_eq!(raw.callback_query_id(), Some("4382bfdwdsb323b2d9"));
    assert_eq!(raw.chat_id().unwrap(), 905);
    assert_eq!(raw.message_id().unwrap(), 17);
}

/// **Test: Inline queries and locations survive the conversion.**
#[test]
fn test_raw_update_from_inline_query_and_location() {
    let inline: teloxide::types::Update = serde_json::from_str(
        r#"{"update_id":9,"inline_query":{"id":"iq","query":"Каз","offset":"",
            "from":{"id":905,"is_bot":false,"first_name":"Алмаз"}}}"#,
    )
    .unwrap();
    let raw = raw_update(&inline).unwrap();
    assert!(raw.is_inline_query());
    assert_eq!(raw.inline_query_id(), Some("iq"));
    assert_eq!(raw.inline_query(), Some("Каз"));

    let location: teloxide::types::Update = serde_json::from_str(
        r#"{"update_id":10,"message":{"message_id":5,"date":1760600000,
            "chat":{"id":905,"type":"private","first_name":"Алмаз"},
            "location":{"latitude":55.8,"longitude":49.1}}}"#,
    )
    .unwrap();
    let coordinates = raw_update(&location).unwrap().coordinates().unwrap();
    assert!((coordinates.latitude - 55.8).abs() < 1e-9);
    assert!((coordinates.longitude - 49.1).abs() < 1e-9);
}

/// **Test: Handled updates are sent; unhandled and empty ones are dropped quietly.**
///
/// **Setup:** Echo answer, recording sendable.
/// **Action:** Handle "Салам", "unknown", "silent".
/// **Expected:** All Ok; only the first produced a delivery.
#[tokio::test]
async fn test_handle_update_delivery() {
    let sendable = RecordingSendable::default();

    handle_update(&EchoAnswer, &sendable, text_update("Салам")).await.unwrap();
    handle_update(&EchoAnswer, &sendable, text_update("unknown")).await.unwrap();
    handle_update(&EchoAnswer, &sendable, text_update("silent")).await.unwrap();

    let sent = sendable.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text(), Some("Салам"));
    assert_eq!(sent[0].chat_id(), Some(905));
}

/// **Test: Build failures other than Unhandled are returned.**
#[tokio::test]
async fn test_handle_update_error() {
    let sendable = RecordingSendable::default();
    let update = Update::new(r#"{"update_id":11,"message":{"message_id":1,"chat":{"id":905}}}"#);

    let result = handle_update(&EchoAnswer, &sendable, update).await;

    assert!(matches!(result, Err(BotError::MalformedUpdate(_))));
    assert!(sendable.sent.lock().unwrap().is_empty());
}
