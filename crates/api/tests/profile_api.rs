//! Profile editing, completion tracking, uploads and profile visibility.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, post_multipart_auth, put_json_auth,
    token_for, PNG_BYTES, STATIC_OTP,
};
use influx_cloud::MemoryStorage;
use influx_core::accounts::AccountKind;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Influencer
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_includes_credits_and_missing_items(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Influencer, inf.id);

    let response = get_auth(app, "/api/v1/influencers/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "asha");
    assert_eq!(json["data"]["credits"]["credits"], 5);
    assert_eq!(json["data"]["is_pro"], false);
    assert_eq!(json["data"]["completion"]["is_complete"], false);
    assert!(json["data"]["completion"]["missing"]
        .as_array()
        .unwrap()
        .contains(&json!("bio")));
    assert!(json["data"].get("device_token").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completed_profile_is_queued_for_review(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(AccountKind::Influencer, inf.id);

    let update = put_json_auth(
        app.clone(),
        "/api/v1/influencers/me",
        json!({
            "bio": "Food and travel from Pune",
            "city_id": 1,
            "instagram_url": "https://instagram.com/asha",
            "collaboration_costs": { "instagram_reel": 5000 },
        }),
        &token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);

    let sent = post_json_auth(
        app.clone(),
        "/api/v1/influencers/me/whatsapp/otp",
        json!({ "whatsapp_number": "9876543210" }),
        &token,
    )
    .await;
    assert_eq!(sent.status(), StatusCode::OK);
    let verified = post_json_auth(
        app.clone(),
        "/api/v1/influencers/me/whatsapp/verify",
        json!({ "whatsapp_number": "9876543210", "otp": STATIC_OTP }),
        &token,
    )
    .await;
    assert_eq!(verified.status(), StatusCode::OK);

    // The profile image is the last missing item.
    let upload = post_multipart_auth(
        app.clone(),
        "/api/v1/influencers/me/images",
        &[("profile_image", "me.png", PNG_BYTES)],
        &token,
    )
    .await;
    assert_eq!(upload.status(), StatusCode::OK);
    let json = body_json(upload).await;
    assert!(json["data"]["profile_image_url"]
        .as_str()
        .unwrap()
        .starts_with("memory://uploads/influencers/profile/"));

    let completion = body_json(
        get_auth(app, "/api/v1/influencers/me/completion", &token).await,
    )
    .await;
    assert_eq!(completion["data"]["completion"]["is_complete"], true);
    assert_eq!(completion["data"]["completion"]["percentage"], 100);
    assert_eq!(completion["data"]["is_verified"], false);
    assert_eq!(completion["data"]["latest_review"]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_profile_fields_are_rejected(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Influencer, inf.id);

    for body in [
        json!({ "instagram_url": "instagram.com/asha" }),
        json!({ "collaboration_costs": { "reel": -1 } }),
        json!({ "city_id": 999_999 }),
        json!({ "bio": "x".repeat(1_001) }),
    ] {
        let response = put_json_auth(app.clone(), "/api/v1/influencers/me", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_non_image(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Influencer, inf.id);

    let response = post_multipart_auth(
        app,
        "/api/v1/influencers/me/images",
        &[("profile_image", "notes.pdf", b"%PDF-1.7 hello".as_slice())],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_upload_stores_nothing(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let storage = Arc::new(MemoryStorage::default());
    let app = common::build_test_app_with_storage(pool.clone(), storage.clone());
    let token = token_for(AccountKind::Influencer, inf.id);

    // A good profile image followed by a bad banner.
    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/influencers/me/images",
        &[
            ("profile_image", "me.png", PNG_BYTES),
            ("banner_image", "notes.pdf", b"%PDF-1.7 hello".as_slice()),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(storage.is_empty().await);

    let response = post_multipart_auth(
        app,
        "/api/v1/influencers/me/images",
        &[
            ("profile_image", "a.png", PNG_BYTES),
            ("profile_image", "b.png", PNG_BYTES),
        ],
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(storage.is_empty().await);

    let (profile_url,): (Option<String>,) =
        sqlx::query_as("SELECT profile_image_url FROM influencers WHERE id = $1")
            .bind(inf.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(profile_url.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_experience_dates_are_checked(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Influencer, inf.id);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/influencers/me/experiences",
        json!({
            "campaign_name": "Launch reel",
            "brand_name": "Chai Co",
            "started_on": "2025-01-01",
            "ended_on": "2025-02-01",
        }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    // Moving the start past the stored end is invalid.
    let update = put_json_auth(
        app.clone(),
        &format!("/api/v1/influencers/me/experiences/{id}"),
        json!({ "started_on": "2025-03-01" }),
        &token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::BAD_REQUEST);

    let deleted = delete_auth(
        app.clone(),
        &format!("/api/v1/influencers/me/experiences/{id}"),
        &token,
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let list = body_json(get_auth(app, "/api/v1/influencers/me/experiences", &token).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_sees_only_verified_influencers(pool: PgPool) {
    let hidden = common::influencer(&pool, "asha", "9876543210").await;
    let visible = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let brand = common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Brand, brand.id);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/influencers/{}", hidden.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &format!("/api/v1/influencers/{}", visible.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "ravi");
    assert!(json["data"].get("phone").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_influencer_cannot_browse_influencers(pool: PgPool) {
    let a = common::verified_influencer(&pool, "asha", "9876543210").await;
    let b = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Influencer, a.id);

    let response = get_auth(app, &format!("/api/v1/influencers/{}", b.id), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Brand
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_profile_completion_and_logo(pool: PgPool) {
    let brand = common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Brand, brand.id);

    let update = put_json_auth(
        app.clone(),
        "/api/v1/brands/me",
        json!({
            "legal_entity_name": "Chai Co Private Limited",
            "company_address": "12 MG Road, Bengaluru",
            "brand_bio": "Single-estate teas",
            "poc_name": "Meera",
            "poc_email": "Meera@Chai.co",
            "poc_contact_number": "+91 90000 00002",
        }),
        &token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);
    let json = body_json(update).await;
    assert_eq!(json["data"]["poc_email"], "meera@chai.co");
    assert_eq!(json["data"]["poc_contact_number"], "9000000002");

    let niches = put_json_auth(
        app.clone(),
        "/api/v1/brands/me/niches",
        json!({ "niche_ids": [1] }),
        &token,
    )
    .await;
    assert_eq!(niches.status(), StatusCode::OK);

    let logo = post_multipart_auth(
        app.clone(),
        "/api/v1/brands/me/logo",
        &[("logo", "logo.png", PNG_BYTES)],
        &token,
    )
    .await;
    assert_eq!(logo.status(), StatusCode::OK);

    let completion = body_json(get_auth(app, "/api/v1/brands/me/completion", &token).await).await;
    assert_eq!(completion["data"]["completion"]["is_complete"], true);
    assert_eq!(completion["data"]["latest_review"]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unverified_brand_hidden_from_influencers(pool: PgPool) {
    let brand = common::brand(&pool, "chaico").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);

    let as_influencer = get_auth(
        app.clone(),
        &format!("/api/v1/brands/{}", brand.id),
        &token_for(AccountKind::Influencer, inf.id),
    )
    .await;
    assert_eq!(as_influencer.status(), StatusCode::NOT_FOUND);

    let as_self = get_auth(
        app,
        &format!("/api/v1/brands/{}", brand.id),
        &token_for(AccountKind::Brand, brand.id),
    )
    .await;
    assert_eq!(as_self.status(), StatusCode::OK);
}
