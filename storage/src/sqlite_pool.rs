//! SQLite connection pool wrapper and idempotent schema creation.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Manages a single SQLite pool; creates DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (`sqlite://path` or `sqlite::memory:`)
    /// and makes sure the schema exists.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let manager = Self { pool };
        manager.init().await?;
        Ok(manager)
    }

    /// Private in-memory database. A single connection keeps every query on the same database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let manager = Self { pool };
        manager.init().await?;
        Ok(manager)
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating database tables if not exist");

        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        city_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        latitude REAL,
        longitude REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        chat_id INTEGER PRIMARY KEY,
        is_active INTEGER NOT NULL DEFAULT 1,
        day INTEGER NOT NULL DEFAULT 2,
        city_id TEXT REFERENCES cities(city_id),
        referrer_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS suras (
        sura_id INTEGER PRIMARY KEY,
        link TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ayats (
        ayat_id INTEGER PRIMARY KEY,
        sura_id INTEGER NOT NULL REFERENCES suras(sura_id),
        ayat_number TEXT NOT NULL,
        arab_text TEXT NOT NULL,
        content TEXT NOT NULL,
        transliteration TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorite_ayats (
        ayat_id INTEGER NOT NULL REFERENCES ayats(ayat_id),
        user_id INTEGER NOT NULL REFERENCES users(chat_id),
        PRIMARY KEY (ayat_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prayers (
        prayer_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        time TEXT NOT NULL,
        city_id TEXT NOT NULL REFERENCES cities(city_id),
        day TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prayers_at_user (
        prayer_at_user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(chat_id),
        prayer_id INTEGER NOT NULL REFERENCES prayers(prayer_id),
        is_read INTEGER NOT NULL DEFAULT 0,
        UNIQUE (user_id, prayer_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS podcasts (
        podcast_id INTEGER PRIMARY KEY,
        telegram_file_id TEXT,
        link TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS podcast_reactions (
        podcast_id INTEGER NOT NULL REFERENCES podcasts(podcast_id),
        user_id INTEGER NOT NULL REFERENCES users(chat_id),
        reaction TEXT NOT NULL CHECK (reaction IN ('like', 'dislike')),
        PRIMARY KEY (podcast_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admin_messages (
        key TEXT PRIMARY KEY,
        text TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_prayers_city_day ON prayers(city_id, day)",
    "CREATE INDEX IF NOT EXISTS idx_ayats_sura ON ayats(sura_id)",
];
