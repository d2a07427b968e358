//! Referral reward and redemption ledger rows.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditTransaction {
    pub id: DbId,
    pub influencer_id: DbId,
    pub transaction_type: String,
    pub amount: i64,
    pub status: String,
    pub referred_influencer_id: Option<DbId>,
    pub redemption_id: Option<DbId>,
    pub upi_id: Option<String>,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Referral totals for one influencer, in rupees.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ReferralTotals {
    pub pending: i64,
    pub in_payout: i64,
    pub paid: i64,
    pub referral_count: i64,
}
