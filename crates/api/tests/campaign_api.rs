//! Campaign lifecycle, discovery, applications, invitations and credits.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, token_for};
use influx_core::accounts::AccountKind;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create and publish a campaign through the API, then move the publish time
/// back so the early access window is over.
async fn published_campaign(app: axum::Router, pool: &PgPool, brand_token: &str, body: Value) -> i64 {
    let created = post_json_auth(app.clone(), "/api/v1/campaigns", body, brand_token).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let activated = post_json_auth(
        app,
        &format!("/api/v1/campaigns/{id}/status"),
        json!({ "status": "active" }),
        brand_token,
    )
    .await;
    assert_eq!(activated.status(), StatusCode::OK);

    sqlx::query("UPDATE campaigns SET published_at = NOW() - INTERVAL '2 days' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

async fn apply(app: axum::Router, campaign_id: i64, token: &str) -> axum::response::Response {
    post_json_auth(
        app,
        &format!("/api/v1/campaigns/{campaign_id}/apply"),
        json!({ "cover_letter": "I post daily food reels", "proposed_rate": 4000 }),
        token,
    )
    .await
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unverified_brand_cannot_create_campaign(pool: PgPool) {
    let brand = common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Brand, brand.id);

    let response = post_json_auth(app, "/api/v1/campaigns", common::campaign_body("Monsoon"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_campaign_status_transitions(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Brand, brand.id);

    let created = post_json_auth(app.clone(), "/api/v1/campaigns", common::campaign_body("Monsoon"), &token).await;
    let json = body_json(created).await;
    assert_eq!(json["data"]["status"], "draft");
    assert!(json["data"]["published_at"].is_null());
    let id = json["data"]["id"].as_i64().unwrap();
    let status_uri = format!("/api/v1/campaigns/{id}/status");

    let skipped = post_json_auth(app.clone(), &status_uri, json!({ "status": "completed" }), &token).await;
    assert_eq!(skipped.status(), StatusCode::CONFLICT);

    let active = post_json_auth(app.clone(), &status_uri, json!({ "status": "active" }), &token).await;
    assert!(body_json(active).await["data"]["published_at"].is_string());

    let paused = post_json_auth(app.clone(), &status_uri, json!({ "status": "paused" }), &token).await;
    assert_eq!(body_json(paused).await["data"]["status"], "paused");

    let bogus = post_json_auth(app.clone(), &status_uri, json!({ "status": "archived" }), &token).await;
    assert_eq!(bogus.status(), StatusCode::BAD_REQUEST);

    let cancelled = post_json_auth(app.clone(), &status_uri, json!({ "status": "cancelled" }), &token).await;
    assert_eq!(cancelled.status(), StatusCode::OK);

    // Terminal campaigns cannot be edited.
    let edit = put_json_auth(app, &format!("/api/v1/campaigns/{id}"), json!({ "name": "Renamed" }), &token).await;
    assert_eq!(edit.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_hidden_from_other_brands(pool: PgPool) {
    let owner = common::verified_brand(&pool, "chaico").await;
    let other = common::verified_brand(&pool, "kettle").await;
    let app = common::build_test_app(pool);
    let owner_token = token_for(AccountKind::Brand, owner.id);

    let created = post_json_auth(app.clone(), "/api/v1/campaigns", common::campaign_body("Monsoon"), &owner_token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let as_other = get_auth(
        app.clone(),
        &format!("/api/v1/campaigns/{id}"),
        &token_for(AccountKind::Brand, other.id),
    )
    .await;
    assert_eq!(as_other.status(), StatusCode::NOT_FOUND);

    let as_owner = get_auth(app, &format!("/api/v1/campaigns/{id}"), &owner_token).await;
    assert_eq!(as_owner.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_targeting_is_validated(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);
    let token = token_for(AccountKind::Brand, brand.id);

    let mut body = common::campaign_body("Monsoon");
    body["is_open_to_all_ages"] = json!(false);
    body["min_age"] = json!(30);
    body["max_age"] = json!(20);
    let response = post_json_auth(app.clone(), "/api/v1/campaigns", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = common::campaign_body("Monsoon");
    body["is_pan_india"] = json!(false);
    let response = post_json_auth(app, "/api/v1/campaigns", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Discovery and applications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_early_access_window_is_pro_only(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);
    let brand_token = token_for(AccountKind::Brand, brand.id);
    let token = token_for(AccountKind::Influencer, inf.id);

    let created = post_json_auth(app.clone(), "/api/v1/campaigns", common::campaign_body("Monsoon"), &brand_token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();
    post_json_auth(
        app.clone(),
        &format!("/api/v1/campaigns/{id}/status"),
        json!({ "status": "active" }),
        &brand_token,
    )
    .await;

    let discovered = body_json(get_auth(app.clone(), "/api/v1/campaigns/discover", &token).await).await;
    assert!(discovered["data"].as_array().unwrap().is_empty());

    let response = apply(app, id, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_spends_one_credit(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);
    let token = token_for(AccountKind::Influencer, inf.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;

    let discovered = body_json(get_auth(app.clone(), "/api/v1/campaigns/discover", &token).await).await;
    assert_eq!(discovered["data"][0]["id"], id);

    let response = apply(app.clone(), id, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["application"]["status"], "applied");
    assert_eq!(json["data"]["credits"]["credits"], 4);

    // A second application to the same campaign is refused and costs nothing.
    let again = apply(app.clone(), id, &token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let credits = body_json(get_auth(app.clone(), "/api/v1/credits/me", &token).await).await;
    assert_eq!(credits["data"]["credits"], 4);

    // The brand was told about the application.
    let feed = body_json(get_auth(app, "/api/v1/notifications", &brand_token).await).await;
    assert_eq!(feed["data"]["unread_count"], 1);
    assert_eq!(feed["data"]["items"][0]["kind"], "application_received");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_without_credits_is_refused(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    sqlx::query("UPDATE influencers SET weekly_credits = 0 WHERE id = $1")
        .bind(inf.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;
    let response = apply(app, id, &token_for(AccountKind::Influencer, inf.id)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("No credits left"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unverified_influencer_cannot_apply(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;
    let response = apply(app, id, &token_for(AccountKind::Influencer, inf.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gender_targeting_blocks_mismatch(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    // Fixture influencers are female.
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);

    let mut body = common::campaign_body("Beard oil");
    body["is_open_to_all_genders"] = json!(false);
    body["genders"] = json!(["male"]);
    let id = published_campaign(app.clone(), &pool, &brand_token, body).await;

    let response = apply(app, id, &token_for(AccountKind::Influencer, inf.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_review_and_withdraw_rules(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);
    let token = token_for(AccountKind::Influencer, inf.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;
    let applied = body_json(apply(app.clone(), id, &token).await).await;
    let application_id = applied["data"]["application"]["id"].as_i64().unwrap();

    let listed = body_json(
        get_auth(app.clone(), &format!("/api/v1/campaigns/{id}/applications"), &brand_token).await,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let selected = put_json_auth(
        app.clone(),
        &format!("/api/v1/campaigns/{id}/applications/{application_id}"),
        json!({ "status": "selected", "notes": "Great fit" }),
        &brand_token,
    )
    .await;
    assert_eq!(selected.status(), StatusCode::OK);
    assert_eq!(body_json(selected).await["data"]["status"], "selected");

    // Selected applications can no longer be withdrawn.
    let withdraw = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/withdraw"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(withdraw.status(), StatusCode::CONFLICT);

    let feed = body_json(get_auth(app, "/api/v1/notifications", &token).await).await;
    assert_eq!(feed["data"]["items"][0]["kind"], "application_updated");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_withdraw_does_not_refund(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);
    let token = token_for(AccountKind::Influencer, inf.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;
    let applied = body_json(apply(app.clone(), id, &token).await).await;
    let application_id = applied["data"]["application"]["id"].as_i64().unwrap();

    let withdraw = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{application_id}/withdraw"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(withdraw.status(), StatusCode::OK);
    assert_eq!(body_json(withdraw).await["data"]["status"], "withdrawn");

    let credits = body_json(get_auth(app, "/api/v1/credits/me", &token).await).await;
    assert_eq!(credits["data"]["credits"], 4);
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invite_only_campaign_requires_invitation(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let invited = common::verified_influencer(&pool, "asha", "9876543210").await;
    let outsider = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);

    let mut body = common::campaign_body("Private tasting");
    body["is_invite_only"] = json!(true);
    let id = published_campaign(app.clone(), &pool, &brand_token, body).await;

    let invite_uri = format!("/api/v1/campaigns/{id}/invitations");
    let response = post_json_auth(
        app.clone(),
        &invite_uri,
        json!({ "influencer_ids": [invited.id, invited.id], "message": "Join us" }),
        &brand_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["invited"].as_array().unwrap().len(), 1);

    let again = post_json_auth(
        app.clone(),
        &invite_uri,
        json!({ "influencer_ids": [invited.id] }),
        &brand_token,
    )
    .await;
    assert_eq!(body_json(again).await["data"]["already_invited"], json!([invited.id]));

    let outsider_apply = apply(app.clone(), id, &token_for(AccountKind::Influencer, outsider.id)).await;
    assert_eq!(outsider_apply.status(), StatusCode::FORBIDDEN);

    let invited_apply = apply(app, id, &token_for(AccountKind::Influencer, invited.id)).await;
    assert_eq!(invited_apply.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_declined_invitation_no_longer_grants_access(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);
    let token = token_for(AccountKind::Influencer, inf.id);

    let mut body = common::campaign_body("Private tasting");
    body["is_invite_only"] = json!(true);
    let id = published_campaign(app.clone(), &pool, &brand_token, body).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/campaigns/{id}/invitations"),
        json!({ "influencer_ids": [inf.id] }),
        &brand_token,
    )
    .await;

    let mine = body_json(get_auth(app.clone(), "/api/v1/invitations/mine", &token).await).await;
    let invitation_id = mine["data"][0]["id"].as_i64().unwrap();

    let declined = post_json_auth(
        app.clone(),
        &format!("/api/v1/invitations/{invitation_id}/respond"),
        json!({ "status": "declined" }),
        &token,
    )
    .await;
    assert_eq!(declined.status(), StatusCode::OK);

    // Responding twice is a conflict.
    let twice = post_json_auth(
        app.clone(),
        &format!("/api/v1/invitations/{invitation_id}/respond"),
        json!({ "status": "accepted" }),
        &token,
    )
    .await;
    assert_eq!(twice.status(), StatusCode::CONFLICT);

    let response = apply(app, id, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_verified_influencers_can_be_invited(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let unverified = common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool.clone());
    let brand_token = token_for(AccountKind::Brand, brand.id);

    let id = published_campaign(app.clone(), &pool, &brand_token, common::campaign_body("Monsoon")).await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/campaigns/{id}/invitations"),
        json!({ "influencer_ids": [unverified.id] }),
        &brand_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
