//! HTTP-level tests for the three sign-in flows and session rotation.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, STATIC_OTP, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Influencer OTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_influencer_signup_then_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let sent = post_json(
        app.clone(),
        "/api/v1/auth/influencer/otp",
        json!({ "phone": "+91 98765 43210" }),
    )
    .await;
    assert_eq!(sent.status(), StatusCode::OK);
    assert_eq!(body_json(sent).await["data"]["is_registered"], false);

    let signup = post_json(
        app.clone(),
        "/api/v1/auth/influencer/signup",
        json!({
            "phone": "9876543210",
            "otp": STATIC_OTP,
            "name": "Asha Rao",
            "username": "Asha_Rao",
            "gender": "female",
            "date_of_birth": "2001-04-12",
            "niche_ids": [1, 2],
        }),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CREATED);
    let json = body_json(signup).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["account_kind"], "influencer");
    assert_eq!(json["profile"]["username"], "asha_rao");
    assert_eq!(json["profile"]["phone"], "9876543210");

    // A consumed code does not block a resend.
    let sent = post_json(
        app.clone(),
        "/api/v1/auth/influencer/otp",
        json!({ "phone": "9876543210" }),
    )
    .await;
    assert_eq!(body_json(sent).await["data"]["is_registered"], true);

    let login = post_json(
        app,
        "/api/v1/auth/influencer/login",
        json!({ "phone": "9876543210", "otp": STATIC_OTP }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_otp_resend_is_rate_limited(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "phone": "9876543210" });

    let first = post_json(app.clone(), "/api/v1/auth/influencer/otp", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/auth/influencer/otp", body).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_with_wrong_code_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(
        app.clone(),
        "/api/v1/auth/influencer/otp",
        json!({ "phone": "9876543210" }),
    )
    .await;

    let signup = post_json(
        app,
        "/api/v1/auth/influencer/signup",
        json!({
            "phone": "9876543210",
            "otp": "000000",
            "name": "Asha",
            "username": "asha",
            "niche_ids": [1],
        }),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::BAD_REQUEST);
    let body = body_json(signup).await;
    assert_eq!(body["error"], "Incorrect OTP");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_phone_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = post_json(
        app,
        "/api/v1/auth/influencer/login",
        json!({ "phone": "9876543210", "otp": STATIC_OTP }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_with_referral_code_links_referrer(pool: PgPool) {
    let referrer = common::influencer(&pool, "ravi", "9000000001").await;
    let app = common::build_test_app(pool.clone());

    post_json(
        app.clone(),
        "/api/v1/auth/influencer/otp",
        json!({ "phone": "9876543210" }),
    )
    .await;
    let signup = post_json(
        app,
        "/api/v1/auth/influencer/signup",
        json!({
            "phone": "9876543210",
            "otp": STATIC_OTP,
            "name": "Asha",
            "username": "asha",
            "niche_ids": [1],
            "referral_code": referrer.referral_code.to_lowercase(),
        }),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CREATED);
    assert_eq!(body_json(signup).await["profile"]["referred_by_id"], referrer.id);
}

// ---------------------------------------------------------------------------
// Brand email + password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_must_verify_email_before_login(pool: PgPool) {
    let app = common::build_test_app(pool);

    let signup = post_json(
        app.clone(),
        "/api/v1/auth/brand/signup",
        json!({
            "brand_name": "Chai Co",
            "username": "chaico",
            "email": "Founder@Chai.co",
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(signup).await["data"]["verification_sent_to"],
        "founder@chai.co"
    );

    let login_body = json!({ "email": "founder@chai.co", "password": TEST_PASSWORD });
    let early = post_json(app.clone(), "/api/v1/auth/brand/login", login_body.clone()).await;
    assert_eq!(early.status(), StatusCode::FORBIDDEN);

    let verified = post_json(
        app.clone(),
        "/api/v1/auth/brand/verify-email",
        json!({ "email": "founder@chai.co", "otp": STATIC_OTP }),
    )
    .await;
    assert_eq!(verified.status(), StatusCode::OK);
    assert_eq!(body_json(verified).await["account_kind"], "brand");

    let login = post_json(app, "/api/v1/auth/brand/login", login_body).await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_username_shared_across_account_kinds(pool: PgPool) {
    common::influencer(&pool, "asha", "9876543210").await;
    let app = common::build_test_app(pool);

    let signup = post_json(
        app.clone(),
        "/api/v1/auth/brand/signup",
        json!({
            "brand_name": "Asha Foods",
            "username": "asha",
            "email": "hello@ashafoods.in",
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CONFLICT);

    let check = get(app, "/api/v1/auth/username-available?username=Asha").await;
    assert_eq!(body_json(check).await["data"]["available"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_locked_after_repeated_failures(pool: PgPool) {
    common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);

    let wrong = json!({ "email": "chaico@example.com", "password": "wrong-password-1" });
    for _ in 0..5 {
        let response = post_json(app.clone(), "/api/v1/auth/brand/login", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let correct = json!({ "email": "chaico@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/brand/login", correct).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_lock_allows_fresh_attempts(pool: PgPool) {
    common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool.clone());

    let wrong = json!({ "email": "chaico@example.com", "password": "wrong-password-1" });
    for _ in 0..5 {
        post_json(app.clone(), "/api/v1/auth/brand/login", wrong.clone()).await;
    }

    sqlx::query(
        "UPDATE brands SET locked_until = NOW() - INTERVAL '1 minute'
         WHERE email = 'chaico@example.com'",
    )
    .execute(&pool)
    .await
    .unwrap();

    // One failure after the lock expires must not lock the account again.
    let response = post_json(app.clone(), "/api/v1/auth/brand/login", wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (count, locked_until): (i32, Option<chrono::DateTime<chrono::Utc>>) = sqlx::query_as(
        "SELECT failed_login_count, locked_until FROM brands WHERE email = 'chaico@example.com'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert!(locked_until.is_none());

    let correct = json!({ "email": "chaico@example.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/brand/login", correct).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset_revokes_sessions(pool: PgPool) {
    common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);

    let login = post_json(
        app.clone(),
        "/api/v1/auth/brand/login",
        json!({ "email": "chaico@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    let refresh_token = body_json(login).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let forgot = post_json(
        app.clone(),
        "/api/v1/auth/brand/forgot-password",
        json!({ "email": "chaico@example.com" }),
    )
    .await;
    assert_eq!(forgot.status(), StatusCode::ACCEPTED);

    let reset = post_json(
        app.clone(),
        "/api/v1/auth/brand/reset-password",
        json!({
            "email": "chaico@example.com",
            "otp": STATIC_OTP,
            "new_password": "An0ther-long-pass",
        }),
    )
    .await;
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let refreshed = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);

    let login = post_json(
        app,
        "/api/v1/auth/brand/login",
        json!({ "email": "chaico@example.com", "password": "An0ther-long-pass" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_hides_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/brand/forgot-password",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    common::admin(&pool, "ops@influx.in").await;
    let app = common::build_test_app(pool);

    let login = post_json(
        app.clone(),
        "/api/v1/auth/admin/login",
        json!({ "email": "ops@influx.in", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let json = body_json(login).await;
    assert_eq!(json["account_kind"], "admin");
    let old = json["refresh_token"].as_str().unwrap().to_string();

    let first = post_json(app.clone(), "/api/v1/auth/refresh", json!({ "refresh_token": old })).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_ne!(body_json(first).await["refresh_token"], old);

    // The old token was revoked by the rotation.
    let replay = post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": old })).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    common::brand(&pool, "chaico").await;
    let app = common::build_test_app(pool);

    let login = post_json(
        app.clone(),
        "/api/v1/auth/brand/login",
        json!({ "email": "chaico@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    let json = body_json(login).await;
    let access = json["access_token"].as_str().unwrap();
    let refresh = json["refresh_token"].as_str().unwrap();

    let me = get_auth(app.clone(), "/api/v1/brands/me", access).await;
    assert_eq!(me.status(), StatusCode::OK);

    let logout = post_json_auth(app.clone(), "/api/v1/auth/logout", json!({}), access).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let refreshed = post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);
}
