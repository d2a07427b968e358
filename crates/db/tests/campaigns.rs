//! Campaign lifecycle, discovery and applications.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use influx_db::models::application::CreateApplication;
use influx_db::models::campaign::{DiscoveryFilter, UpdateCampaign};
use influx_db::repositories::application_repo::ApplyOutcome;
use influx_db::repositories::{ApplicationRepo, CampaignRepo, InvitationRepo};
use sqlx::PgPool;

fn filter_for(influencer_id: i64) -> DiscoveryFilter {
    DiscoveryFilter {
        influencer_id,
        niche_ids: vec![],
        age: Some(26),
        gender: Some("female".to_string()),
        city_id: None,
        is_pro: false,
        early_access_cutoff: Utc::now() - Duration::hours(24),
        search: None,
        niche_filter: None,
        city_filter: None,
        limit: 50,
        offset: 0,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_activation_stamps_published_at(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let campaign = CampaignRepo::create(&pool, brand.id, &common::open_campaign("Launch"))
        .await
        .unwrap();
    assert_eq!(campaign.status, "draft");
    assert!(campaign.published_at.is_none());
    assert_eq!(campaign.brand_name, "acme Pvt Ltd");

    assert!(CampaignRepo::set_status(&pool, campaign.id, "draft", "active").await.unwrap());
    let first = CampaignRepo::find_by_id(&pool, campaign.id).await.unwrap().unwrap();
    let published = first.published_at.expect("published_at set");

    assert!(CampaignRepo::set_status(&pool, campaign.id, "active", "paused").await.unwrap());
    assert!(CampaignRepo::set_status(&pool, campaign.id, "paused", "active").await.unwrap());
    let again = CampaignRepo::find_by_id(&pool, campaign.id).await.unwrap().unwrap();
    assert_eq!(again.published_at, Some(published));

    // Stale expected status is refused.
    assert!(!CampaignRepo::set_status(&pool, campaign.id, "draft", "active").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_associations(pool: PgPool) {
    let niches = common::niche_ids(&pool).await;
    let cities = common::city_ids(&pool).await;
    let brand = common::brand(&pool, "acme").await;
    let mut input = common::open_campaign("Launch");
    input.niche_ids = vec![niches[0]];
    let campaign = CampaignRepo::create(&pool, brand.id, &input).await.unwrap();
    assert_eq!(campaign.niche_ids, vec![niches[0]]);

    let updated = CampaignRepo::update(
        &pool,
        campaign.id,
        &UpdateCampaign {
            name: Some("Relaunch".to_string()),
            is_pan_india: Some(false),
            city_ids: Some(vec![cities[1], cities[0]]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Relaunch");
    assert_eq!(updated.niche_ids, vec![niches[0]]);
    let mut expected = vec![cities[0], cities[1]];
    expected.sort();
    assert_eq!(updated.city_ids, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_applies_targeting(pool: PgPool) {
    let niches = common::niche_ids(&pool).await;
    let cities = common::city_ids(&pool).await;
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;

    let open = common::live_campaign(&pool, brand.id, &common::open_campaign("Open")).await;

    let mut niche_only = common::open_campaign("Niche");
    niche_only.niche_ids = vec![niches[0]];
    let niche_only = common::live_campaign(&pool, brand.id, &niche_only).await;

    let mut male_only = common::open_campaign("Male");
    male_only.is_open_to_all_genders = false;
    male_only.genders = vec!["male".to_string()];
    common::live_campaign(&pool, brand.id, &male_only).await;

    let mut adults = common::open_campaign("Age");
    adults.is_open_to_all_ages = false;
    adults.min_age = Some(30);
    adults.max_age = Some(40);
    common::live_campaign(&pool, brand.id, &adults).await;

    let mut city = common::open_campaign("City");
    city.is_pan_india = false;
    city.city_ids = vec![cities[0]];
    let city = common::live_campaign(&pool, brand.id, &city).await;

    let mut invite_only = common::open_campaign("Invite");
    invite_only.is_invite_only = true;
    let invite_only = common::live_campaign(&pool, brand.id, &invite_only).await;

    // Draft campaigns never show.
    CampaignRepo::create(&pool, brand.id, &common::open_campaign("Draft"))
        .await
        .unwrap();

    let mut filter = filter_for(inf.id);
    let ids: Vec<i64> = CampaignRepo::discover(&pool, &filter)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![open.id]);

    filter.niche_ids = vec![niches[0]];
    filter.city_id = Some(cities[0]);
    let mut ids: Vec<i64> = CampaignRepo::discover(&pool, &filter)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec![open.id, niche_only.id, city.id]);

    // An invitation opens even the invite-only campaign.
    InvitationRepo::create_many(&pool, invite_only.id, &[inf.id], None)
        .await
        .unwrap();
    let found = CampaignRepo::discover(&pool, &filter).await.unwrap();
    assert!(found.iter().any(|c| c.id == invite_only.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_early_access_is_pro_only(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let fresh = CampaignRepo::create(&pool, brand.id, &common::open_campaign("Fresh"))
        .await
        .unwrap();
    CampaignRepo::set_status(&pool, fresh.id, "draft", "active").await.unwrap();

    let mut filter = filter_for(inf.id);
    assert!(CampaignRepo::discover(&pool, &filter).await.unwrap().is_empty());

    filter.is_pro = true;
    let found = CampaignRepo::discover(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, fresh.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_search_filter(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    common::live_campaign(&pool, brand.id, &common::open_campaign("Diwali Sale")).await;
    common::live_campaign(&pool, brand.id, &common::open_campaign("Monsoon Drop")).await;

    let mut filter = filter_for(inf.id);
    filter.search = Some("diwali".to_string());
    let found = CampaignRepo::discover(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Diwali Sale");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_spends_credit_and_rejects_duplicates(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let campaign = common::live_campaign(&pool, brand.id, &common::open_campaign("Open")).await;

    let input = CreateApplication {
        campaign_id: campaign.id,
        influencer_id: inf.id,
        cover_letter: Some("Hi".to_string()),
        proposed_rate: None,
    };
    let outcome = ApplicationRepo::create_charging_credit(&pool, &input, Utc::now())
        .await
        .unwrap();
    assert_matches!(outcome, ApplyOutcome::Applied { ref balance, .. } if balance.credits == 4);

    let err = ApplicationRepo::create_charging_credit(&pool, &input, Utc::now())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db)
            if db.constraint() == Some("uq_campaign_applications_campaign_influencer")
    );

    // The failed attempt rolled back: still four credits.
    let (credits,): (i32,) = sqlx::query_as("SELECT weekly_credits FROM influencers WHERE id = $1")
        .bind(inf.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(credits, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_without_credits(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let campaign = common::live_campaign(&pool, brand.id, &common::open_campaign("Open")).await;
    sqlx::query("UPDATE influencers SET weekly_credits = 0 WHERE id = $1")
        .bind(inf.id)
        .execute(&pool)
        .await
        .unwrap();

    let input = CreateApplication {
        campaign_id: campaign.id,
        influencer_id: inf.id,
        cover_letter: None,
        proposed_rate: None,
    };
    let outcome = ApplicationRepo::create_charging_credit(&pool, &input, Utc::now())
        .await
        .unwrap();
    assert_matches!(
        outcome,
        ApplyOutcome::NoCredits { ref balance, ref reason }
            if balance.credits == 0 && reason.starts_with("No credits left this week")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_only_from_open_statuses(pool: PgPool) {
    let brand = common::brand(&pool, "acme").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let campaign = common::live_campaign(&pool, brand.id, &common::open_campaign("Open")).await;
    let input = CreateApplication {
        campaign_id: campaign.id,
        influencer_id: inf.id,
        cover_letter: None,
        proposed_rate: None,
    };
    let ApplyOutcome::Applied { application, .. } =
        ApplicationRepo::create_charging_credit(&pool, &input, Utc::now())
            .await
            .unwrap()
    else {
        panic!("expected application");
    };

    ApplicationRepo::update_status(&pool, application.id, "applied", "selected", None)
        .await
        .unwrap()
        .unwrap();

    let withdrawn = ApplicationRepo::withdraw(
        &pool,
        application.id,
        inf.id,
        &["applied", "under_review"],
    )
    .await
    .unwrap();
    assert!(withdrawn.is_none());
}
