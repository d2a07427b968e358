//! Repository for the `campaign_applications` table.

use influx_core::campaign::APPLICATION_WITHDRAWN;
use influx_core::credits::{self, CreditBalance, APPLICATION_CREDIT_COST};
use influx_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::application::{
    ApplicantView, CampaignApplication, CreateApplication, MyApplicationView,
};

const COLUMNS: &str = "id, campaign_id, influencer_id, status, cover_letter, proposed_rate, \
                       brand_notes, reviewed_at, withdrawn_at, created_at, updated_at";

/// Result of an application attempt that charges a weekly credit.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied {
        application: CampaignApplication,
        balance: CreditBalance,
    },
    /// The influencer had no credits left; nothing was written.
    NoCredits {
        balance: CreditBalance,
        reason: String,
    },
}

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert an application and spend one weekly credit in one transaction.
    ///
    /// The influencer row is locked while the balance is resolved, so two
    /// concurrent applications cannot both spend the last credit. A duplicate
    /// application surfaces as a unique violation.
    pub async fn create_charging_credit(
        pool: &PgPool,
        input: &CreateApplication,
        now: Timestamp,
    ) -> Result<ApplyOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (stored, reset_at): (i32, Option<Timestamp>) = sqlx::query_as(
            "SELECT weekly_credits, weekly_credits_reset_at FROM influencers
             WHERE id = $1 FOR UPDATE",
        )
        .bind(input.influencer_id)
        .fetch_one(&mut *tx)
        .await?;

        let balance = credits::effective_balance(stored, reset_at, now);
        if let Err(reason) = credits::ensure_can_apply(&balance) {
            if balance.was_reset {
                Self::save_balance(&mut tx, input.influencer_id, &balance).await?;
                tx.commit().await?;
            }
            return Ok(ApplyOutcome::NoCredits { balance, reason });
        }

        let query = format!(
            "INSERT INTO campaign_applications (campaign_id, influencer_id, cover_letter, proposed_rate)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, CampaignApplication>(&query)
            .bind(input.campaign_id)
            .bind(input.influencer_id)
            .bind(&input.cover_letter)
            .bind(input.proposed_rate)
            .fetch_one(&mut *tx)
            .await?;

        let balance = CreditBalance {
            credits: balance.credits - APPLICATION_CREDIT_COST,
            was_reset: true,
            ..balance
        };
        Self::save_balance(&mut tx, input.influencer_id, &balance).await?;

        tx.commit().await?;
        Ok(ApplyOutcome::Applied {
            application,
            balance,
        })
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CampaignApplication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_applications WHERE id = $1");
        sqlx::query_as::<_, CampaignApplication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Applicants for a campaign, newest first, optionally filtered by status.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApplicantView>, sqlx::Error> {
        sqlx::query_as::<_, ApplicantView>(
            "SELECT a.id, a.campaign_id, a.influencer_id, a.status, a.cover_letter,
                    a.proposed_rate, a.created_at,
                    i.name AS influencer_name,
                    i.username AS influencer_username,
                    i.profile_image_url AS influencer_profile_image_url
             FROM campaign_applications a
             JOIN influencers i ON i.id = a.influencer_id
             WHERE a.campaign_id = $1
               AND ($2::TEXT IS NULL OR a.status = $2)
             ORDER BY a.created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(campaign_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// An influencer's applications with campaign context, newest first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MyApplicationView>, sqlx::Error> {
        sqlx::query_as::<_, MyApplicationView>(
            "SELECT a.id, a.campaign_id, a.status, a.cover_letter, a.proposed_rate,
                    a.created_at, a.updated_at,
                    c.name AS campaign_name,
                    c.campaign_type,
                    b.brand_name
             FROM campaign_applications a
             JOIN campaigns c ON c.id = a.campaign_id
             JOIN brands b ON b.id = c.brand_id
             WHERE a.influencer_id = $1
             ORDER BY a.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(influencer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Brand-side status change guarded on the current status.
    ///
    /// Returns `None` if the row was no longer in `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        brand_notes: Option<&str>,
    ) -> Result<Option<CampaignApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_applications SET
                status = $3,
                brand_notes = COALESCE($4, brand_notes),
                reviewed_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignApplication>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(brand_notes)
            .fetch_optional(pool)
            .await
    }

    /// Withdraw an application still in one of `withdrawable` statuses.
    ///
    /// Returns `None` if the row moved on (e.g. was selected) in the meantime.
    pub async fn withdraw(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
        withdrawable: &[&str],
    ) -> Result<Option<CampaignApplication>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_applications SET status = $3, withdrawn_at = NOW()
             WHERE id = $1 AND influencer_id = $2 AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        let withdrawable: Vec<String> = withdrawable.iter().map(|s| s.to_string()).collect();
        sqlx::query_as::<_, CampaignApplication>(&query)
            .bind(id)
            .bind(influencer_id)
            .bind(APPLICATION_WITHDRAWN)
            .bind(&withdrawable)
            .fetch_optional(pool)
            .await
    }

    async fn save_balance(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        influencer_id: DbId,
        balance: &CreditBalance,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE influencers SET weekly_credits = $2, weekly_credits_reset_at = $3
             WHERE id = $1",
        )
        .bind(influencer_id)
        .bind(balance.credits)
        .bind(balance.resets_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
