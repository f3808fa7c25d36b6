use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub chat_id: i64,
    pub is_active: bool,
    /// Day of the daily content the user continues from.
    pub day: i64,
    pub city_id: Option<String>,
    pub referrer_id: Option<i64>,
}
