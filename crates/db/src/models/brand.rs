//! Brand entity model and DTOs.

use influx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full brand row from the `brands` table.
///
/// Contains the password hash -- never serialize this directly.
/// Use [`BrandResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Brand {
    pub id: DbId,
    pub brand_name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub legal_entity_name: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub brand_bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub poc_name: Option<String>,
    pub poc_designation: Option<String>,
    pub poc_email: Option<String>,
    pub poc_contact_number: Option<String>,
    pub is_email_verified: bool,
    pub is_profile_completed: bool,
    pub is_verified: bool,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub device_token: Option<String>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe brand representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BrandResponse {
    pub id: DbId,
    pub brand_name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub legal_entity_name: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub brand_bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub poc_name: Option<String>,
    pub poc_designation: Option<String>,
    pub poc_email: Option<String>,
    pub poc_contact_number: Option<String>,
    pub is_email_verified: bool,
    pub is_profile_completed: bool,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<Brand> for BrandResponse {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id,
            brand_name: b.brand_name,
            username: b.username,
            email: b.email,
            phone: b.phone,
            legal_entity_name: b.legal_entity_name,
            company_address: b.company_address,
            company_website: b.company_website,
            brand_bio: b.brand_bio,
            profile_image_url: b.profile_image_url,
            poc_name: b.poc_name,
            poc_designation: b.poc_designation,
            poc_email: b.poc_email,
            poc_contact_number: b.poc_contact_number,
            is_email_verified: b.is_email_verified,
            is_profile_completed: b.is_profile_completed,
            is_verified: b.is_verified,
            created_at: b.created_at,
        }
    }
}

/// DTO for brand signup.
pub struct CreateBrand {
    pub brand_name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// DTO for brand profile edits. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateBrand {
    pub brand_name: Option<String>,
    pub phone: Option<String>,
    pub legal_entity_name: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub brand_bio: Option<String>,
    pub poc_name: Option<String>,
    pub poc_designation: Option<String>,
    pub poc_email: Option<String>,
    pub poc_contact_number: Option<String>,
}
