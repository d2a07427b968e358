//! Repository for the `cities` lookup table.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::lookup::City;

const COLUMNS: &str = "id, name, state, is_tier_one";

pub struct CityRepo;

impl CityRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities ORDER BY is_tier_one DESC, name");
        sqlx::query_as::<_, City>(&query).fetch_all(pool).await
    }

    /// Count how many of `ids` exist.
    pub async fn count_existing(pool: &PgPool, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cities WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
