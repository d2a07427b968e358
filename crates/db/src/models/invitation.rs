//! Campaign invitation model.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignInvitation {
    pub id: DbId,
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub status: String,
    pub message: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Invitation joined with its campaign, as the invitee sees it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyInvitationView {
    pub id: DbId,
    pub campaign_id: DbId,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Timestamp,
    pub campaign_name: String,
    pub brand_name: String,
}
