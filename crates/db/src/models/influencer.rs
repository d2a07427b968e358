//! Influencer entity model and DTOs.

use influx_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full influencer row from the `influencers` table.
///
/// The device token is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Influencer {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub city_id: Option<DbId>,
    pub whatsapp_number: Option<String>,
    pub is_whatsapp_verified: bool,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub collaboration_costs: Option<serde_json::Value>,
    pub referral_code: String,
    pub referred_by_id: Option<DbId>,
    pub weekly_credits: i32,
    pub weekly_credits_reset_at: Option<Timestamp>,
    pub is_profile_completed: bool,
    pub is_verified: bool,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub device_token: Option<String>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Influencer {
    /// Social links in a fixed order: instagram, youtube, facebook, linkedin, twitter.
    pub fn social_links(&self) -> [Option<&str>; 5] {
        [
            self.instagram_url.as_deref(),
            self.youtube_url.as_deref(),
            self.facebook_url.as_deref(),
            self.linkedin_url.as_deref(),
            self.twitter_url.as_deref(),
        ]
    }
}

/// Reduced influencer view shown to brands.
#[derive(Debug, Clone, Serialize)]
pub struct InfluencerPublic {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub city_id: Option<DbId>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub collaboration_costs: Option<serde_json::Value>,
    pub is_verified: bool,
}

impl From<Influencer> for InfluencerPublic {
    fn from(i: Influencer) -> Self {
        Self {
            id: i.id,
            name: i.name,
            username: i.username,
            gender: i.gender,
            bio: i.bio,
            profile_image_url: i.profile_image_url,
            banner_image_url: i.banner_image_url,
            city_id: i.city_id,
            instagram_url: i.instagram_url,
            youtube_url: i.youtube_url,
            facebook_url: i.facebook_url,
            linkedin_url: i.linkedin_url,
            twitter_url: i.twitter_url,
            collaboration_costs: i.collaboration_costs,
            is_verified: i.is_verified,
        }
    }
}

/// DTO for creating an influencer at signup.
pub struct CreateInfluencer {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub referral_code: String,
    pub referred_by_id: Option<DbId>,
    pub weekly_credits: i32,
    pub weekly_credits_reset_at: Timestamp,
}

/// DTO for profile edits. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateInfluencer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub city_id: Option<DbId>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub collaboration_costs: Option<serde_json::Value>,
}
