//! Repository for the `campaign_invitations` table.

use influx_core::campaign::INVITATION_PENDING;
use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::invitation::{CampaignInvitation, MyInvitationView};

const COLUMNS: &str = "id, campaign_id, influencer_id, status, message, responded_at, \
                       created_at, updated_at";

pub struct InvitationRepo;

impl InvitationRepo {
    /// Invite each influencer once. Existing invitations are left untouched;
    /// only the newly created rows are returned.
    pub async fn create_many(
        pool: &PgPool,
        campaign_id: DbId,
        influencer_ids: &[DbId],
        message: Option<&str>,
    ) -> Result<Vec<CampaignInvitation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_invitations (campaign_id, influencer_id, message)
             SELECT $1, UNNEST($2::BIGINT[]), $3
             ON CONFLICT (campaign_id, influencer_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignInvitation>(&query)
            .bind(campaign_id)
            .bind(influencer_ids)
            .bind(message)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CampaignInvitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_invitations WHERE id = $1");
        sqlx::query_as::<_, CampaignInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the influencer holds a non-declined invitation to the campaign.
    pub async fn is_invited(
        pool: &PgPool,
        campaign_id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM campaign_invitations
                WHERE campaign_id = $1 AND influencer_id = $2 AND status <> 'declined'
             )",
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// An influencer's invitations with campaign context, newest first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MyInvitationView>, sqlx::Error> {
        sqlx::query_as::<_, MyInvitationView>(
            "SELECT ci.id, ci.campaign_id, ci.status, ci.message, ci.created_at,
                    c.name AS campaign_name, b.brand_name
             FROM campaign_invitations ci
             JOIN campaigns c ON c.id = ci.campaign_id
             JOIN brands b ON b.id = c.brand_id
             WHERE ci.influencer_id = $1 AND c.is_active = true
             ORDER BY ci.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(influencer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Accept or decline a pending invitation.
    ///
    /// Returns `None` if it was not pending or belongs to someone else.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
        status: &str,
    ) -> Result<Option<CampaignInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_invitations SET status = $3, responded_at = NOW()
             WHERE id = $1 AND influencer_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignInvitation>(&query)
            .bind(id)
            .bind(influencer_id)
            .bind(status)
            .bind(INVITATION_PENDING)
            .fetch_optional(pool)
            .await
    }
}
