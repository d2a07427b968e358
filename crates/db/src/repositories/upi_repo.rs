//! Repository for the `influencer_upis` table.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::upi::InfluencerUpi;

const COLUMNS: &str = "id, influencer_id, upi_id, is_primary, created_at";

pub struct UpiRepo;

impl UpiRepo {
    /// Add a UPI id. The first one an influencer adds becomes primary.
    pub async fn create(
        pool: &PgPool,
        influencer_id: DbId,
        upi_id: &str,
    ) -> Result<InfluencerUpi, sqlx::Error> {
        let query = format!(
            "INSERT INTO influencer_upis (influencer_id, upi_id, is_primary)
             VALUES ($1, $2, NOT EXISTS (
                SELECT 1 FROM influencer_upis
                WHERE influencer_id = $1 AND is_active = true AND is_primary = true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InfluencerUpi>(&query)
            .bind(influencer_id)
            .bind(upi_id)
            .fetch_one(pool)
            .await
    }

    /// Active UPI ids, primary first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
    ) -> Result<Vec<InfluencerUpi>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM influencer_upis
             WHERE influencer_id = $1 AND is_active = true
             ORDER BY is_primary DESC, created_at DESC"
        );
        sqlx::query_as::<_, InfluencerUpi>(&query)
            .bind(influencer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_primary(
        pool: &PgPool,
        influencer_id: DbId,
    ) -> Result<Option<InfluencerUpi>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM influencer_upis
             WHERE influencer_id = $1 AND is_active = true AND is_primary = true"
        );
        sqlx::query_as::<_, InfluencerUpi>(&query)
            .bind(influencer_id)
            .fetch_optional(pool)
            .await
    }

    /// Make one UPI id primary, demoting the previous one.
    ///
    /// Returns `false` if the id does not belong to the influencer.
    pub async fn set_primary(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (owned,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM influencer_upis
                           WHERE id = $1 AND influencer_id = $2 AND is_active = true)",
        )
        .bind(id)
        .bind(influencer_id)
        .fetch_one(&mut *tx)
        .await?;
        if !owned {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE influencer_upis SET is_primary = false
             WHERE influencer_id = $1 AND is_primary = true",
        )
        .bind(influencer_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE influencer_upis SET is_primary = true WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Soft-delete a UPI id. Deleting the primary promotes the newest remaining one.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(bool,)> = sqlx::query_as(
            "SELECT is_primary FROM influencer_upis
             WHERE id = $1 AND influencer_id = $2 AND is_active = true
             FOR UPDATE",
        )
        .bind(id)
        .bind(influencer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((was_primary,)) = row else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE influencer_upis SET is_active = false, is_primary = false WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if was_primary {
            sqlx::query(
                "UPDATE influencer_upis SET is_primary = true
                 WHERE id = (SELECT id FROM influencer_upis
                             WHERE influencer_id = $1 AND is_active = true
                             ORDER BY created_at DESC LIMIT 1)",
            )
            .bind(influencer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
