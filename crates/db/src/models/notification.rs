//! In-app notification feed.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub account_kind: String,
    pub account_id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for writing a feed entry.
pub struct CreateNotification {
    pub account_kind: String,
    pub account_id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}
