//! Prayer times per city and day, and per-user read marks.
//!
//! The marks of one user for one day are materialized lazily on first view. Creation is a
//! single multi-row `INSERT` guarded by `UNIQUE(user_id, prayer_id)`: of two concurrent
//! creations exactly one commits and the other fails with [`BotError::PrayersDoubled`].

use chrono::NaiveDate;
use qbot_core::{BotError, Result};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{info, instrument};

use crate::error::{db_error, StorageError};
use crate::models::{Prayer, UserPrayer};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PrayerRepository {
    pool_manager: SqlitePoolManager,
}

impl PrayerRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// The city's prayers of `day`, in time order.
    pub async fn prayers_for(&self, city_id: &str, day: NaiveDate) -> Result<Vec<Prayer>> {
        let prayers = sqlx::query_as::<_, Prayer>(
            r#"
            SELECT p.prayer_id, p.name, p.time, p.city_id, c.name AS city_name, p.day
            FROM prayers p
            INNER JOIN cities c ON p.city_id = c.city_id
            WHERE p.city_id = ? AND p.day = ?
            ORDER BY p.time
            "#,
        )
        .bind(city_id)
        .bind(day)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_error)?;

        if prayers.is_empty() {
            return Err(BotError::PrayersNotFound {
                city_id: city_id.to_string(),
                day: day.to_string(),
            });
        }
        Ok(prayers)
    }

    /// The user's marks for the given prayers, in prayer time order.
    pub async fn user_prayers(&self, chat_id: i64, prayer_ids: &[i64]) -> Result<Vec<UserPrayer>> {
        if prayer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT pau.prayer_at_user_id, pau.prayer_id, pau.is_read
            FROM prayers_at_user pau
            INNER JOIN prayers p ON pau.prayer_id = p.prayer_id
            WHERE pau.user_id = "#,
        );
        builder.push_bind(chat_id);
        builder.push(" AND pau.prayer_id IN (");
        let mut ids = builder.separated(", ");
        for id in prayer_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY p.time");

        builder
            .build_query_as::<UserPrayer>()
            .fetch_all(self.pool_manager.pool())
            .await
            .map_err(db_error)
    }

    /// Creates unread marks for every prayer in one statement.
    #[instrument(skip(self, prayer_ids))]
    pub async fn create_user_prayers(&self, chat_id: i64, prayer_ids: &[i64]) -> Result<Vec<UserPrayer>> {
        if prayer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO prayers_at_user (user_id, prayer_id, is_read) ");
        builder.push_values(prayer_ids, |mut row, prayer_id| {
            row.push_bind(chat_id).push_bind(*prayer_id).push_bind(false);
        });

        builder
            .build()
            .execute(self.pool_manager.pool())
            .await
            .map_err(|e| match StorageError::from(e) {
                StorageError::AlreadyExists(_) => BotError::PrayersDoubled(chat_id),
                other => other.into(),
            })?;
        info!(chat_id, count = prayer_ids.len(), "User prayers created");

        self.user_prayers(chat_id, prayer_ids).await
    }

    /// Sets the read flag of one of the user's marks.
    pub async fn change_status(&self, prayer_at_user_id: i64, chat_id: i64, is_read: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE prayers_at_user SET is_read = ? WHERE prayer_at_user_id = ? AND user_id = ?",
        )
        .bind(is_read)
        .bind(prayer_at_user_id)
        .bind(chat_id)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "prayer mark {} of user {}",
                prayer_at_user_id, chat_id
            ))
            .into());
        }
        Ok(())
    }

    /// Day of the prayer a mark refers to.
    pub async fn day_of_user_prayer(&self, prayer_at_user_id: i64) -> Result<NaiveDate> {
        let row: Option<(NaiveDate,)> = sqlx::query_as(
            r#"
            SELECT p.day
            FROM prayers_at_user pau
            INNER JOIN prayers p ON pau.prayer_id = p.prayer_id
            WHERE pau.prayer_at_user_id = ?
            "#,
        )
        .bind(prayer_at_user_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)?;

        row.map(|(day,)| day).ok_or_else(|| {
            StorageError::NotFound(format!("prayer mark {}", prayer_at_user_id)).into()
        })
    }
}
