//! Issued one-time password model.

use influx_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Otp {
    pub id: DbId,
    pub destination: String,
    pub purpose: String,
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub sent_at: Timestamp,
}
