//! Influencer payout UPI ids.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InfluencerUpi {
    pub id: DbId,
    pub influencer_id: DbId,
    pub upi_id: String,
    pub is_primary: bool,
    pub created_at: Timestamp,
}
