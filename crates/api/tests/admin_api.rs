//! Admin moderation: profile reviews, referral payouts and Pro grants.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, token_for};
use influx_core::accounts::AccountKind;
use influx_db::repositories::ProfileReviewRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn admin_token(pool: &PgPool) -> String {
    let admin = common::admin(pool, "ops@influx.in").await;
    token_for(AccountKind::Admin, admin.id)
}

/// Submit an influencer profile for review and return the review id.
async fn submit(pool: &PgPool, influencer_id: i64) -> i64 {
    ProfileReviewRepo::submit(pool, "influencer", influencer_id)
        .await
        .unwrap()
        .expect("new pending review")
        .id
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_reject_other_accounts(pool: PgPool) {
    let brand = common::verified_brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        "/api/v1/admin/profile-reviews",
        &token_for(AccountKind::Brand, brand.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Profile reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_verifies_and_rewards_referrer(pool: PgPool) {
    let referrer = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let referee =
        common::influencer_referred_by(&pool, "asha", "9876543210", Some(referrer.id)).await;
    let review_id = submit(&pool, referee.id).await;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let pending = body_json(
        get_auth(app.clone(), "/api/v1/admin/profile-reviews?status=pending", &token).await,
    )
    .await;
    assert_eq!(pending["data"][0]["id"], review_id);

    let detail = body_json(
        get_auth(app.clone(), &format!("/api/v1/admin/profile-reviews/{review_id}"), &token).await,
    )
    .await;
    assert_eq!(detail["data"]["profile"]["username"], "asha");

    let approve_uri = format!("/api/v1/admin/profile-reviews/{review_id}/approve");
    let approved = post_json_auth(app.clone(), &approve_uri, json!({}), &token).await;
    assert_eq!(approved.status(), StatusCode::OK);
    let json = body_json(approved).await;
    assert_eq!(json["data"]["review"]["status"], "approved");
    assert_eq!(json["data"]["referral_reward"]["amount"], 50);
    assert_eq!(json["data"]["referral_reward"]["influencer_id"], referrer.id);

    let again = post_json_auth(app.clone(), &approve_uri, json!({}), &token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let referee_token = token_for(AccountKind::Influencer, referee.id);
    let completion = body_json(
        get_auth(app.clone(), "/api/v1/influencers/me/completion", &referee_token).await,
    )
    .await;
    assert_eq!(completion["data"]["is_verified"], true);

    let referrer_token = token_for(AccountKind::Influencer, referrer.id);
    let summary = body_json(get_auth(app.clone(), "/api/v1/referrals/me", &referrer_token).await).await;
    assert_eq!(summary["data"]["totals"]["pending"], 50);
    assert_eq!(summary["data"]["totals"]["referral_count"], 1);

    let feed = body_json(get_auth(app, "/api/v1/notifications", &referrer_token).await).await;
    assert_eq!(feed["data"]["items"][0]["kind"], "referral_reward");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejection_requires_reason(pool: PgPool) {
    let inf = common::influencer(&pool, "asha", "9876543210").await;
    let review_id = submit(&pool, inf.id).await;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let reject_uri = format!("/api/v1/admin/profile-reviews/{review_id}/reject");

    let blank = post_json_auth(app.clone(), &reject_uri, json!({ "reason": "  " }), &token).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let rejected = post_json_auth(
        app.clone(),
        &reject_uri,
        json!({ "reason": "Profile photo is blurry" }),
        &token,
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::OK);
    let json = body_json(rejected).await;
    assert_eq!(json["data"]["status"], "rejected");
    assert_eq!(json["data"]["rejection_reason"], "Profile photo is blurry");

    let feed = body_json(
        get_auth(app, "/api/v1/notifications", &token_for(AccountKind::Influencer, inf.id)).await,
    )
    .await;
    assert_eq!(feed["data"]["items"][0]["kind"], "profile_rejected");
}

// ---------------------------------------------------------------------------
// Redemptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_redemption_payout_flow(pool: PgPool) {
    let referrer = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let referrer_token = token_for(AccountKind::Influencer, referrer.id);

    for (username, phone) in [("asha", "9876543210"), ("meera", "9000000002")] {
        let referee =
            common::influencer_referred_by(&pool, username, phone, Some(referrer.id)).await;
        let review_id = submit(&pool, referee.id).await;
        let approved = post_json_auth(
            app.clone(),
            &format!("/api/v1/admin/profile-reviews/{review_id}/approve"),
            json!({}),
            &token,
        )
        .await;
        assert_eq!(approved.status(), StatusCode::OK);
    }

    let upi = post_json_auth(
        app.clone(),
        "/api/v1/upi",
        json!({ "upi_id": "ravi@okaxis" }),
        &referrer_token,
    )
    .await;
    assert_eq!(upi.status(), StatusCode::CREATED);

    let redeemed = post_json_auth(
        app.clone(),
        "/api/v1/referrals/redeem",
        json!({ "upi_id": "ravi@okaxis" }),
        &referrer_token,
    )
    .await;
    assert_eq!(redeemed.status(), StatusCode::CREATED);
    let redemption = body_json(redeemed).await;
    assert_eq!(redemption["data"]["amount"], 100);
    assert_eq!(redemption["data"]["status"], "processing");
    let redemption_id = redemption["data"]["id"].as_i64().unwrap();

    // Nothing left to redeem.
    let empty = post_json_auth(
        app.clone(),
        "/api/v1/referrals/redeem",
        json!({ "upi_id": "ravi@okaxis" }),
        &referrer_token,
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let queue = body_json(
        get_auth(app.clone(), "/api/v1/admin/redemptions?status=processing", &token).await,
    )
    .await;
    assert_eq!(queue["data"][0]["id"], redemption_id);

    let paid_uri = format!("/api/v1/admin/redemptions/{redemption_id}/paid");
    let paid = post_json_auth(app.clone(), &paid_uri, json!({}), &token).await;
    assert_eq!(paid.status(), StatusCode::OK);
    assert_eq!(body_json(paid).await["data"]["status"], "paid");

    let twice = post_json_auth(app.clone(), &paid_uri, json!({}), &token).await;
    assert_eq!(twice.status(), StatusCode::CONFLICT);

    let summary = body_json(get_auth(app, "/api/v1/referrals/me", &referrer_token).await).await;
    assert_eq!(summary["data"]["totals"]["paid"], 100);
    assert_eq!(summary["data"]["totals"]["pending"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_redeem_below_minimum_is_refused(pool: PgPool) {
    let referrer = common::verified_influencer(&pool, "ravi", "9000000001").await;
    let referee =
        common::influencer_referred_by(&pool, "asha", "9876543210", Some(referrer.id)).await;
    let review_id = submit(&pool, referee.id).await;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    post_json_auth(
        app.clone(),
        &format!("/api/v1/admin/profile-reviews/{review_id}/approve"),
        json!({}),
        &token,
    )
    .await;

    let response = post_json_auth(
        app,
        "/api/v1/referrals/redeem",
        json!({ "upi_id": "ravi@okaxis" }),
        &token_for(AccountKind::Influencer, referrer.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("Minimum redemption is 100"));
}

// ---------------------------------------------------------------------------
// Pro
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pro_grant_extend_and_cancel(pool: PgPool) {
    let inf = common::verified_influencer(&pool, "asha", "9876543210").await;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let pro_uri = format!("/api/v1/admin/influencers/{}/pro", inf.id);
    let inf_token = token_for(AccountKind::Influencer, inf.id);

    let invalid = post_json_auth(app.clone(), &pro_uri, json!({ "months": 0 }), &token).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let first = post_json_auth(app.clone(), &pro_uri, json!({ "months": 1 }), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;

    let second = post_json_auth(app.clone(), &pro_uri, json!({ "months": 2 }), &token).await;
    let second = body_json(second).await;
    assert_eq!(second["data"]["starts_at"], first["data"]["ends_at"]);

    let status = body_json(get_auth(app.clone(), "/api/v1/pro/me", &inf_token).await).await;
    assert_eq!(status["data"]["is_pro"], true);
    assert_eq!(status["data"]["subscription"]["id"], first["data"]["id"]);

    let cancelled = delete_auth(app.clone(), &pro_uri, &token).await;
    assert_eq!(cancelled.status(), StatusCode::NO_CONTENT);

    let status = body_json(get_auth(app.clone(), "/api/v1/pro/me", &inf_token).await).await;
    assert_eq!(status["data"]["is_pro"], false);

    let again = delete_auth(app, &pro_uri, &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
