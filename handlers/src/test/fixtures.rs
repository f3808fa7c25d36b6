//! Seed data shared by handler tests.

use std::sync::Arc;

use chrono::NaiveDate;
use qbot_core::{TgRequest, Update};
use serde_json::Value;
use sqlx::SqlitePool;
use storage::{
    AyatSearchQuery, InMemoryStateStore, PrayerName, SqlitePoolManager, StateStore, UserStates,
};

/// Chat registered with Kazan as its city.
pub const CHAT_WITH_CITY: i64 = 905;
/// Chat registered without a city.
pub const CHAT_WITHOUT_CITY: i64 = 2;

pub fn prayer_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

pub struct Fixture {
    pub pool_manager: SqlitePoolManager,
    pub store: Arc<InMemoryStateStore>,
}

impl Fixture {
    pub async fn in_memory() -> Self {
        let pool_manager = SqlitePoolManager::in_memory().await.unwrap();
        seed(pool_manager.pool()).await;
        Self {
            pool_manager,
            store: Arc::new(InMemoryStateStore::new()),
        }
    }

    pub async fn file_backed(path: &std::path::Path) -> Self {
        let url = format!("sqlite://{}", path.display());
        let pool_manager = SqlitePoolManager::new(&url).await.unwrap();
        seed(pool_manager.pool()).await;
        Self {
            pool_manager,
            store: Arc::new(InMemoryStateStore::new()),
        }
    }

    pub fn states(&self) -> Arc<UserStates> {
        let store: Arc<dyn StateStore> = self.store.clone();
        Arc::new(UserStates::new(store))
    }

    pub fn queries(&self) -> AyatSearchQuery {
        AyatSearchQuery::new(self.store.clone())
    }
}

async fn execute(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql).execute(pool).await.unwrap();
}

async fn seed(pool: &SqlitePool) {
    execute(pool, "INSERT INTO suras (sura_id, link) VALUES (1, '/content/1'), (2, '/content/2')").await;
    execute(
        pool,
        r#"INSERT INTO ayats (ayat_id, sura_id, ayat_number, arab_text, content, transliteration) VALUES
            (1, 1, '1-7', 'arab1', 'Хвала Аллаху, Господу миров', 'tr1'),
            (2, 2, '1', 'arab2', 'Алиф. Лям. Мим.', 'tr2'),
            (3, 2, '2', 'arab3', 'Эта Книга, в которой нет сомнения', 'tr3'),
            (4, 2, '3,4', 'arab4', 'которые веруют в сокровенное, милость', 'tr4'),
            (5, 2, '5', 'arab5', 'Они следуют верному руководству, милость', 'tr5')"#,
    )
    .await;
    execute(
        pool,
        r#"INSERT INTO cities (city_id, name, latitude, longitude) VALUES
            ('kazan', 'Казань', 55.79, 49.12),
            ('moscow', 'Москва', 55.75, 37.62)"#,
    )
    .await;
    execute(pool, "INSERT INTO users (chat_id, city_id) VALUES (905, 'kazan')").await;
    execute(pool, "INSERT INTO users (chat_id) VALUES (2)").await;
    execute(
        pool,
        "INSERT INTO admin_messages (key, text) VALUES ('start', 'Ассаляму алейкум!'), ('help', 'Справка')",
    )
    .await;
    execute(
        pool,
        r#"INSERT INTO podcasts (podcast_id, telegram_file_id, link) VALUES
            (5, 'aoiejf298jr9p23u8qr3', 'https://link-to-file.domain/5.mp3'),
            (6, NULL, 'https://link-to-file.domain/6.mp3')"#,
    )
    .await;

    let times = ["04:50:00", "06:40:00", "11:55:00", "14:20:00", "16:45:00", "18:30:00"];
    for (index, (name, time)) in PrayerName::ALL.iter().zip(times).enumerate() {
        sqlx::query("INSERT INTO prayers (prayer_id, name, time, city_id, day) VALUES (?, ?, ?, 'kazan', '2026-10-16')")
            .bind(index as i64 + 1)
            .bind(name.as_str())
            .bind(time)
            .execute(pool)
            .await
            .unwrap();
    }
}

pub fn text_update(chat_id: i64, text: &str) -> Update {
    Update::new(format!(
        r#"{{"update_id":1,"message":{{"message_id":100,"text":"{}","chat":{{"id":{}}},"from":{{"id":{}}}}}}}"#,
        text, chat_id, chat_id
    ))
}

pub fn callback_update(chat_id: i64, data: &str) -> Update {
    Update::new(format!(
        r#"{{"update_id":2,"callback_query":{{"id":"cb1","data":"{}","from":{{"id":{}}},"message":{{"message_id":101,"chat":{{"id":{}}}}}}}}}"#,
        data, chat_id, chat_id
    ))
}

/// `reply_markup` of a request parsed back to JSON.
pub fn markup_json(request: &TgRequest) -> Value {
    let raw = request
        .param("reply_markup")
        .and_then(Value::as_str)
        .unwrap();
    serde_json::from_str(raw).unwrap()
}
