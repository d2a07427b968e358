//! Repository for the `niches` lookup table.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::lookup::Niche;

const COLUMNS: &str = "id, name, slug, is_active, created_at";

pub struct NicheRepo;

impl NicheRepo {
    /// List active niches alphabetically.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Niche>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM niches WHERE is_active = true ORDER BY name");
        sqlx::query_as::<_, Niche>(&query).fetch_all(pool).await
    }

    /// Count how many of `ids` name active niches.
    ///
    /// Callers compare against the deduplicated input length.
    pub async fn count_active(pool: &PgPool, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM niches WHERE id = ANY($1) AND is_active = true",
        )
        .bind(ids)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
