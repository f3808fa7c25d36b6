//! End-to-end routing tests: raw update JSON through [`quranbot::QuranbotAnswer`] against
//! an in-memory database and state store.

use std::sync::Arc;

use answer_chain::FALLBACK_TEXT;
use qbot_core::{Answer, Endpoint, Update, UserStateRepository, UserStep};
use quranbot::{BotComponents, QuranbotAnswer, CHANGE_CITY_TEXT, SEARCH_PROMPT_TEXT};
use serde_json::Value;
use sqlx::SqlitePool;
use storage::{InMemoryStateStore, SqlitePoolManager};

async fn execute(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql).execute(pool).await.unwrap();
}

/// Sura 2 with three ayats, Kazan with a day of prayers, user 905 with five marks.
async fn seed(pool: &SqlitePool) {
    execute(pool, "INSERT INTO suras (sura_id, link) VALUES (2, '/content/2')").await;
    execute(
        pool,
        r#"INSERT INTO ayats (ayat_id, sura_id, ayat_number, arab_text, content, transliteration) VALUES
            (1, 2, '1', 'a1', 'Алиф. Лям. Мим.', 't1'),
            (2, 2, '2', 'a2', 'Эта Книга, в которой нет сомнения', 't2'),
            (3, 2, '3', 'a3', 'которые веруют в сокровенное, милость', 't3')"#,
    )
    .await;
    execute(
        pool,
        "INSERT INTO cities (city_id, name, latitude, longitude) VALUES ('kazan', 'Казань', 55.79, 49.12)",
    )
    .await;
    execute(pool, "INSERT INTO users (chat_id, city_id) VALUES (905, 'kazan')").await;
    execute(pool, "INSERT INTO users (chat_id) VALUES (1)").await;
    execute(
        pool,
        r#"INSERT INTO prayers (prayer_id, name, time, city_id, day) VALUES
            (1, 'fajr', '04:50:00', 'kazan', '2026-10-16'),
            (2, 'sunrise', '06:40:00', 'kazan', '2026-10-16'),
            (3, 'dhuhr', '11:55:00', 'kazan', '2026-10-16'),
            (4, 'asr', '14:20:00', 'kazan', '2026-10-16'),
            (5, 'maghrib', '16:45:00', 'kazan', '2026-10-16'),
            (6, 'isha''a', '18:30:00', 'kazan', '2026-10-16')"#,
    )
    .await;
    execute(
        pool,
        r#"INSERT INTO prayers_at_user (prayer_at_user_id, user_id, prayer_id, is_read) VALUES
            (1, 905, 1, 0), (2, 905, 3, 0), (3, 905, 4, 0), (4, 905, 5, 0), (5, 905, 6, 0)"#,
    )
    .await;
    execute(
        pool,
        "INSERT INTO podcasts (podcast_id, telegram_file_id, link) VALUES (5, 'aoiejf298jr9p23u8qr3', 'https://link-to-file.domain/5.mp3')",
    )
    .await;
}

struct Harness {
    answer: QuranbotAnswer,
    components: BotComponents,
}

impl Harness {
    async fn new() -> Self {
        let pool_manager = SqlitePoolManager::in_memory().await.unwrap();
        seed(pool_manager.pool()).await;
        let components =
            BotComponents::new(pool_manager, Arc::new(InMemoryStateStore::new()), vec![358]);
        Self {
            answer: QuranbotAnswer::new(&components).unwrap(),
            components,
        }
    }

    async fn step(&self, chat_id: i64) -> UserStep {
        self.components.states.step(chat_id).await.unwrap()
    }
}

fn text_update(chat_id: i64, text: &str) -> Update {
    Update::new(format!(
        r#"{{"update_id":1,"message":{{"message_id":10,"text":"{}","chat":{{"id":{}}}}}}}"#,
        text, chat_id
    ))
}

fn callback_update(chat_id: i64, data: &str) -> Update {
    Update::new(format!(
        r#"{{"update_id":2,"callback_query":{{"id":"cb","data":"{}","from":{{"id":{}}},"message":{{"message_id":11,"chat":{{"id":{}}}}}}}}}"#,
        data, chat_id, chat_id
    ))
}

fn markup(request: &qbot_core::TgRequest) -> Value {
    serde_json::from_str(request.param("reply_markup").and_then(Value::as_str).unwrap()).unwrap()
}

/// **Test: "Найти аят" starts the text search flow.**
///
/// **Setup:** Chat 1 with no stored step.
/// **Action:** Route a "Найти аят" message.
/// **Expected:** One request with the search prompt; the chat is now in ayat search.
#[tokio::test]
async fn test_find_ayat_starts_search() {
    let harness = Harness::new().await;

    let requests = harness
        .answer
        .build(&text_update(1, "Найти аят"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text(), Some(SEARCH_PROMPT_TEXT));
    assert_eq!(requests[0].chat_id(), Some(1));
    assert_eq!(harness.step(1).await, UserStep::AyatSearch);
}

/// **Test: A prayer mark callback toggles regardless of the chat's step.**
///
/// **Setup:** Chat 905 in ayat search, so step-gated routes do not match a callback.
/// **Action:** Route `mark_readed(3)`.
/// **Expected:** One keyboard edit and the press acknowledgement; the third mark is read.
#[tokio::test]
async fn test_mark_readed_ignores_step() {
    let harness = Harness::new().await;
    harness
        .components
        .states
        .change_step(905, UserStep::AyatSearch)
        .await
        .unwrap();

    let requests = harness
        .answer
        .build(&callback_update(905, "mark_readed(3)"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].endpoint, Endpoint::EditMessageReplyMarkup);
    assert_eq!(requests[0].param("message_id").and_then(Value::as_i64), Some(11));
    assert_eq!(requests[1].endpoint, Endpoint::AnswerCallbackQuery);
    let row = markup(&requests[0])["inline_keyboard"][0].clone();
    assert_eq!(row[2]["text"], "✅");
    assert_eq!(row[2]["callback_data"], "mark_not_readed(3)");
    assert_eq!(row[0]["text"], "❌");
}

/// **Test: Free text in the search step is searched and cached; pagination follows it.**
#[tokio::test]
async fn test_search_flow() {
    let harness = Harness::new().await;
    harness.answer.build(&text_update(905, "Найти аят")).await.unwrap();

    let found = harness
        .answer
        .build(&text_update(905, "Книга"))
        .await
        .unwrap();

    assert!(found[0].text().unwrap().contains("2:2)</a>"));
    assert_eq!(harness.components.queries.read(905).await.unwrap(), "Книга");
    let row = markup(&found[0])["inline_keyboard"][0].clone();
    assert_eq!(row.as_array().unwrap().len(), 1);
    assert_eq!(row[0]["text"], "стр. 1/1");
}

/// **Test: Unknown text outside any flow gets the fallback reply.**
#[tokio::test]
async fn test_fallback() {
    let harness = Harness::new().await;

    let requests = harness
        .answer
        .build(&text_update(905, "привет"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text(), Some(FALLBACK_TEXT));
    assert_eq!(requests[0].chat_id(), Some(905));
}

/// **Test: Domain not-found errors become an explanatory reply.**
#[tokio::test]
async fn test_ayat_not_found_reply() {
    let harness = Harness::new().await;

    let requests = harness
        .answer
        .build(&text_update(905, "2:300"))
        .await
        .unwrap();

    assert_eq!(requests[0].text(), Some("Аят не найден"));
}

/// **Test: City change flow by button, then by typed name.**
///
/// **Setup:** Chat 1 without a city.
/// **Action:** "Время намаза", then "Казань".
/// **Expected:** Invitation with the inline search button and the city search step; then
/// the confirmation and the step reset.
#[tokio::test]
async fn test_city_flow() {
    let harness = Harness::new().await;

    let invite = harness
        .answer
        .build(&text_update(1, "Время намаза"))
        .await
        .unwrap();
    assert_eq!(
        markup(&invite[0])["inline_keyboard"][0][0]["switch_inline_query_current_chat"],
        ""
    );
    assert_eq!(harness.step(1).await, UserStep::CitySearch);

    let changed = harness
        .answer
        .build(&text_update(1, "Казань"))
        .await
        .unwrap();
    assert_eq!(
        changed[0].text(),
        Some("Вам будет приходить время намаза для города Казань")
    );
    assert_eq!(harness.step(1).await, UserStep::Nothing);
}

/// **Test: "Поменять город" moves to city search; a location outside it is ignored.**
#[tokio::test]
async fn test_location_gated_by_city_search() {
    let harness = Harness::new().await;
    let location = Update::new(
        r#"{"message":{"message_id":12,"chat":{"id":905},"location":{"latitude":55.8,"longitude":49.1}}}"#,
    );

    let ignored = harness.answer.build(&location).await.unwrap();
    assert!(ignored.is_empty());

    let prompt = harness
        .answer
        .build(&text_update(905, "Поменять город"))
        .await
        .unwrap();
    assert_eq!(prompt[0].text(), Some(CHANGE_CITY_TEXT));
    assert_eq!(harness.step(905).await, UserStep::CitySearch);

    let changed = harness.answer.build(&location).await.unwrap();
    assert!(changed[0].text().unwrap().ends_with("Казань"));
}

/// **Test: A page label press is only acknowledged; inline queries are routed.**
#[tokio::test]
async fn test_fake_callback_and_inline_query() {
    let harness = Harness::new().await;

    let fake = harness
        .answer
        .build(&callback_update(905, "fake"))
        .await
        .unwrap();
    assert_eq!(fake.len(), 1);
    assert_eq!(fake[0].endpoint, Endpoint::AnswerCallbackQuery);
    assert_eq!(fake[0].param("callback_query_id").and_then(Value::as_str), Some("cb"));

    let inline = harness
        .answer
        .build(&Update::new(
            r#"{"inline_query":{"id":"iq","query":"Каз","from":{"id":905}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(inline[0].endpoint, Endpoint::AnswerInlineQuery);
}

/// **Test: `/start` for a new chat notifies the admin chat.**
#[tokio::test]
async fn test_start_notifies_admin() {
    let harness = Harness::new().await;
    execute(
        harness.components.pool_manager.pool(),
        "INSERT INTO admin_messages (key, text) VALUES ('start', 'Ассаляму алейкум!')",
    )
    .await;

    let requests = harness
        .answer
        .build(&text_update(77, "/start"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].chat_id(), Some(358));
}

/// **Test: A referral link notifies the referrer before the admin.**
#[tokio::test]
async fn test_start_with_referral_link() {
    let harness = Harness::new().await;
    execute(
        harness.components.pool_manager.pool(),
        "INSERT INTO admin_messages (key, text) VALUES ('start', 'Ассаляму алейкум!')",
    )
    .await;

    let requests = harness
        .answer
        .build(&text_update(78, "/start 905"))
        .await
        .unwrap();

    let recipients: Vec<_> = requests.iter().map(|r| r.chat_id().unwrap()).collect();
    assert_eq!(recipients, vec![78, 78, 905, 358]);
}

/// **Test: The podcast button and a `/podcastN` command send the episode.**
///
/// **Setup:** One uploaded podcast, id 5.
/// **Action:** Route "🎧 Подкасты", "/podcast5" and "/podcast7".
/// **Expected:** sendAudio with `/podcast5` as caption, then without it; the unknown
/// number gets the not-found reply.
#[tokio::test]
async fn test_podcast_routes() {
    let harness = Harness::new().await;

    let random = harness
        .answer
        .build(&text_update(905, "🎧 Подкасты"))
        .await
        .unwrap();
    assert_eq!(random[0].endpoint, Endpoint::SendAudio);
    assert_eq!(random[0].param("caption").and_then(Value::as_str), Some("/podcast5"));

    let concrete = harness
        .answer
        .build(&text_update(905, "/podcast5"))
        .await
        .unwrap();
    assert_eq!(concrete[0].endpoint, Endpoint::SendAudio);
    assert!(concrete[0].param("caption").is_none());

    let missing = harness
        .answer
        .build(&text_update(905, "/podcast7"))
        .await
        .unwrap();
    assert_eq!(missing[0].text(), Some("Подкаст не найден"));
}

/// **Test: A reaction press redraws the totals, ends any flow and is acknowledged.**
///
/// **Setup:** Chat 905 in ayat search.
/// **Action:** Route `like(5)`.
/// **Expected:** Keyboard edit with "👍 1", then answerCallbackQuery; the step is reset.
#[tokio::test]
async fn test_podcast_reaction_route() {
    let harness = Harness::new().await;
    harness
        .components
        .states
        .change_step(905, UserStep::AyatSearch)
        .await
        .unwrap();

    let requests = harness
        .answer
        .build(&callback_update(905, "like(5)"))
        .await
        .unwrap();

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].endpoint, Endpoint::EditMessageReplyMarkup);
    assert_eq!(markup(&requests[0])["inline_keyboard"][0][0]["text"], "👍 1");
    assert_eq!(requests[1].endpoint, Endpoint::AnswerCallbackQuery);
    assert_eq!(harness.step(905).await, UserStep::Nothing);
}

/// **Test: `/status` answers with the backend report.**
#[tokio::test]
async fn test_status_route() {
    let harness = Harness::new().await;

    let requests = harness
        .answer
        .build(&text_update(905, "/status"))
        .await
        .unwrap();

    assert_eq!(
        requests[0].text(),
        Some("База данных: ok, активных пользователей: 2\nХранилище состояний: ok")
    );
}
