//! Repository for the `pro_subscriptions` table.

use influx_core::pro::{PRO_ACTIVE, PRO_CANCELLED, PRO_EXPIRED};
use influx_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::pro_subscription::ProSubscription;

const COLUMNS: &str = "id, influencer_id, status, starts_at, ends_at, granted_by, \
                       created_at, updated_at";

pub struct ProSubscriptionRepo;

impl ProSubscriptionRepo {
    /// The influencer's active period that has not ended, if any.
    pub async fn find_current(
        pool: &PgPool,
        influencer_id: DbId,
        now: Timestamp,
    ) -> Result<Option<ProSubscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pro_subscriptions
             WHERE influencer_id = $1 AND status = $2 AND starts_at <= $3 AND ends_at > $3
             ORDER BY ends_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ProSubscription>(&query)
            .bind(influencer_id)
            .bind(PRO_ACTIVE)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// End of the furthest active period, including periods queued to start
    /// later. New grants are appended after it.
    pub async fn latest_active_end(
        pool: &PgPool,
        influencer_id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let (end,): (Option<Timestamp>,) = sqlx::query_as(
            "SELECT MAX(ends_at) FROM pro_subscriptions WHERE influencer_id = $1 AND status = $2",
        )
        .bind(influencer_id)
        .bind(PRO_ACTIVE)
        .fetch_one(pool)
        .await?;
        Ok(end)
    }

    pub async fn create(
        pool: &PgPool,
        influencer_id: DbId,
        starts_at: Timestamp,
        ends_at: Timestamp,
        granted_by: Option<DbId>,
    ) -> Result<ProSubscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO pro_subscriptions (influencer_id, status, starts_at, ends_at, granted_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProSubscription>(&query)
            .bind(influencer_id)
            .bind(PRO_ACTIVE)
            .bind(starts_at)
            .bind(ends_at)
            .bind(granted_by)
            .fetch_one(pool)
            .await
    }

    /// Cancel every active period for an influencer. Returns the count cancelled.
    pub async fn cancel_active(pool: &PgPool, influencer_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pro_subscriptions SET status = $2
             WHERE influencer_id = $1 AND status = $3",
        )
        .bind(influencer_id)
        .bind(PRO_CANCELLED)
        .bind(PRO_ACTIVE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark active periods past their end as expired. Returns the count updated.
    pub async fn expire_ended(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pro_subscriptions SET status = $1 WHERE status = $2 AND ends_at <= $3",
        )
        .bind(PRO_EXPIRED)
        .bind(PRO_ACTIVE)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
