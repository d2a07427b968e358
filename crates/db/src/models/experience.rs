//! Influencer past-collaboration entries.

use influx_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Experience {
    pub id: DbId,
    pub influencer_id: DbId,
    pub campaign_name: String,
    pub brand_name: String,
    pub niche_id: Option<DbId>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub started_on: Option<Date>,
    pub ended_on: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateExperience {
    pub campaign_name: String,
    pub brand_name: String,
    pub niche_id: Option<DbId>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub started_on: Option<Date>,
    pub ended_on: Option<Date>,
}

#[derive(Debug, Default)]
pub struct UpdateExperience {
    pub campaign_name: Option<String>,
    pub brand_name: Option<String>,
    pub niche_id: Option<DbId>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub started_on: Option<Date>,
    pub ended_on: Option<Date>,
}
