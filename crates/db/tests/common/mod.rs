//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use influx_core::types::DbId;
use influx_db::models::brand::{Brand, CreateBrand};
use influx_db::models::campaign::{Campaign, CreateCampaign};
use influx_db::models::influencer::{CreateInfluencer, Influencer};
use influx_db::repositories::{BrandRepo, CampaignRepo, InfluencerRepo};
use sqlx::PgPool;

pub async fn influencer(pool: &PgPool, username: &str, phone: &str) -> Influencer {
    influencer_referred_by(pool, username, phone, None).await
}

pub async fn influencer_referred_by(
    pool: &PgPool,
    username: &str,
    phone: &str,
    referred_by_id: Option<DbId>,
) -> Influencer {
    let input = CreateInfluencer {
        name: username.to_string(),
        username: username.to_string(),
        phone: phone.to_string(),
        gender: Some("female".to_string()),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 1, 15),
        referral_code: format!("{}CODE", username.to_uppercase()),
        referred_by_id,
        weekly_credits: 5,
        weekly_credits_reset_at: Utc::now() + Duration::days(3),
    };
    InfluencerRepo::create(pool, &input, &[]).await.unwrap()
}

pub async fn brand(pool: &PgPool, username: &str) -> Brand {
    let input = CreateBrand {
        brand_name: format!("{username} Pvt Ltd"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        phone: None,
        password_hash: "$argon2id$placeholder".to_string(),
    };
    BrandRepo::create(pool, &input).await.unwrap()
}

pub fn open_campaign(name: &str) -> CreateCampaign {
    CreateCampaign {
        name: name.to_string(),
        description: "Summer launch".to_string(),
        deliverables: Some("1 reel".to_string()),
        campaign_type: "paid".to_string(),
        budget_per_influencer: Some(5_000),
        is_open_to_all_ages: true,
        min_age: None,
        max_age: None,
        is_open_to_all_genders: true,
        genders: vec![],
        is_pan_india: true,
        is_invite_only: false,
        application_deadline: None,
        niche_ids: vec![],
        city_ids: vec![],
    }
}

/// Create a campaign and activate it, then backdate `published_at` so the
/// early-access window has passed.
pub async fn live_campaign(pool: &PgPool, brand_id: DbId, input: &CreateCampaign) -> Campaign {
    let campaign = CampaignRepo::create(pool, brand_id, input).await.unwrap();
    assert!(CampaignRepo::set_status(pool, campaign.id, "draft", "active")
        .await
        .unwrap());
    sqlx::query("UPDATE campaigns SET published_at = NOW() - INTERVAL '2 days' WHERE id = $1")
        .bind(campaign.id)
        .execute(pool)
        .await
        .unwrap();
    CampaignRepo::find_by_id(pool, campaign.id)
        .await
        .unwrap()
        .unwrap()
}

pub async fn niche_ids(pool: &PgPool) -> Vec<DbId> {
    influx_db::repositories::NicheRepo::list_active(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect()
}

pub async fn city_ids(pool: &PgPool) -> Vec<DbId> {
    influx_db::repositories::CityRepo::list(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect()
}
