//! Supported cities, searched by name or by the nearest coordinates.

use qbot_core::{Coordinates, Result};

use crate::error::db_error;
use crate::models::City;
use crate::sqlite_pool::SqlitePoolManager;

const NAME_SEARCH_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct CityRepository {
    pool_manager: SqlitePoolManager,
}

impl CityRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn add(&self, city: &City) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO cities (city_id, name, latitude, longitude) VALUES (?, ?, ?, ?)",
        )
        .bind(&city.city_id)
        .bind(&city.name)
        .bind(city.latitude)
        .bind(city.longitude)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    /// Cities whose name contains `query`, alphabetically.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<City>> {
        sqlx::query_as::<_, City>(
            "SELECT city_id, name, latitude, longitude FROM cities WHERE name LIKE ? ORDER BY name LIMIT ?",
        )
        .bind(format!("%{}%", query.trim()))
        .bind(NAME_SEARCH_LIMIT)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_error)
    }

    /// Closest city with known coordinates.
    pub async fn nearest(&self, coordinates: Coordinates) -> Result<Option<City>> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT city_id, name, latitude, longitude
            FROM cities
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY (latitude - ?) * (latitude - ?) + (longitude - ?) * (longitude - ?)
            LIMIT 1
            "#,
        )
        .bind(coordinates.latitude)
        .bind(coordinates.latitude)
        .bind(coordinates.longitude)
        .bind(coordinates.longitude)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_error)
    }
}
