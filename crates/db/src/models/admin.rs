//! Admin account model.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full admin row. Contains the password hash; use [`AdminResponse`] for output.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub last_login_at: Option<Timestamp>,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name.clone(),
            email: admin.email.clone(),
            last_login_at: admin.last_login_at,
        }
    }
}

/// DTO for creating an admin.
pub struct CreateAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
