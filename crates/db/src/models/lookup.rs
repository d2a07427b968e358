//! Seeded lookup tables: niches and cities.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Niche {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub name: String,
    pub state: String,
    pub is_tier_one: bool,
}
