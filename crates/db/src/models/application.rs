//! Campaign application model and list views.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `campaign_applications`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignApplication {
    pub id: DbId,
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub status: String,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<i64>,
    pub brand_notes: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub withdrawn_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Application joined with the applicant, as a brand sees it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicantView {
    pub id: DbId,
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub status: String,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<i64>,
    pub created_at: Timestamp,
    pub influencer_name: String,
    pub influencer_username: String,
    pub influencer_profile_image_url: Option<String>,
}

/// Application joined with its campaign, as the influencer sees it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyApplicationView {
    pub id: DbId,
    pub campaign_id: DbId,
    pub status: String,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub campaign_name: String,
    pub campaign_type: String,
    pub brand_name: String,
}

/// DTO for a new application.
pub struct CreateApplication {
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<i64>,
}
