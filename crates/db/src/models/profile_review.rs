//! Profile review queue model.

use influx_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileReview {
    pub id: DbId,
    pub profile_type: String,
    pub profile_id: DbId,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub rejection_reason: Option<String>,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Filters for the admin review list.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewListParams {
    pub status: Option<String>,
    pub profile_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
