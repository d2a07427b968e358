//! Pro tier subscription periods.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProSubscription {
    pub id: DbId,
    pub influencer_id: DbId,
    pub status: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub granted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
