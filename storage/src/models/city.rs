use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub city_id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
