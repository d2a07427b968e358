//! Campaign entity model and DTOs.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Campaign row enriched with its niche/city ids and the brand name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub brand_id: DbId,
    pub brand_name: String,
    pub name: String,
    pub description: String,
    pub deliverables: Option<String>,
    pub campaign_type: String,
    pub budget_per_influencer: Option<i64>,
    pub status: String,
    pub is_open_to_all_ages: bool,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: bool,
    pub genders: Vec<String>,
    pub is_pan_india: bool,
    pub is_invite_only: bool,
    pub application_deadline: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub is_active: bool,
    pub niche_ids: Vec<DbId>,
    pub city_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a campaign. Niche and city rows are written alongside.
pub struct CreateCampaign {
    pub name: String,
    pub description: String,
    pub deliverables: Option<String>,
    pub campaign_type: String,
    pub budget_per_influencer: Option<i64>,
    pub is_open_to_all_ages: bool,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: bool,
    pub genders: Vec<String>,
    pub is_pan_india: bool,
    pub is_invite_only: bool,
    pub application_deadline: Option<Timestamp>,
    pub niche_ids: Vec<DbId>,
    pub city_ids: Vec<DbId>,
}

/// DTO for editing a campaign. `None` leaves a field unchanged; `Some` on the
/// id lists replaces the association set.
#[derive(Debug, Default)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deliverables: Option<String>,
    pub budget_per_influencer: Option<i64>,
    pub is_open_to_all_ages: Option<bool>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: Option<bool>,
    pub genders: Option<Vec<String>>,
    pub is_pan_india: Option<bool>,
    pub is_invite_only: Option<bool>,
    pub application_deadline: Option<Timestamp>,
    pub niche_ids: Option<Vec<DbId>>,
    pub city_ids: Option<Vec<DbId>>,
}

/// Influencer-side inputs for the discovery query.
#[derive(Debug, Clone)]
pub struct DiscoveryFilter {
    pub influencer_id: DbId,
    pub niche_ids: Vec<DbId>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city_id: Option<DbId>,
    pub is_pro: bool,
    /// Campaigns published after this instant are still in early access.
    pub early_access_cutoff: Timestamp,
    pub search: Option<String>,
    pub niche_filter: Option<DbId>,
    pub city_filter: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
