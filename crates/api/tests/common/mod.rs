//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use influx_api::auth::jwt::{generate_access_token, JwtConfig};
use influx_api::auth::password::hash_password;
use influx_api::config::{OtpConfig, ServerConfig};
use influx_api::router::build_app_router;
use influx_api::state::AppState;
use influx_cloud::MemoryStorage;
use influx_core::accounts::AccountKind;
use influx_core::types::DbId;
use influx_db::models::admin::{Admin, CreateAdmin};
use influx_db::models::brand::{Brand, CreateBrand};
use influx_db::models::influencer::{CreateInfluencer, Influencer};
use influx_db::repositories::{AdminRepo, BrandRepo, InfluencerRepo};
use influx_events::Notifier;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Every OTP issued by the test app uses this code.
pub const STATIC_OTP: &str = "123456";

pub const TEST_PASSWORD: &str = "Sup3r-secret-pass";

/// Smallest byte sequence the upload sniffer accepts as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 6 * 1024 * 1024,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        otp: OtpConfig {
            secret: "integration-otp-secret".to_string(),
            static_code: Some(STATIC_OTP.to_string()),
        },
        admin_bootstrap: None,
    }
}

/// Build the production router over `pool` with in-memory uploads and no
/// outbound notification channels.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_storage(pool, Arc::new(MemoryStorage::default()))
}

/// Same as [`build_test_app`] but the caller keeps a handle on the store.
pub fn build_test_app_with_storage(pool: PgPool, storage: Arc<MemoryStorage>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
        notifier: Notifier::disabled(),
    };
    build_app_router(state, &config)
}

/// Mint an access token without going through a login flow.
pub fn token_for(kind: AccountKind, account_id: DbId) -> String {
    generate_access_token(account_id, kind, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a multipart form with one file part per `(field, filename, bytes)`.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    files: &[(&str, &str, &[u8])],
    token: &str,
) -> Response<Body> {
    let boundary = "influx-test-boundary";
    let mut body = Vec::new();
    for (field, filename, bytes) in files {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

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
        name: format!("{username} name"),
        username: username.to_string(),
        phone: phone.to_string(),
        gender: Some("female".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 15),
        referral_code: format!("{}CODE", username.to_uppercase()),
        referred_by_id,
        weekly_credits: 5,
        weekly_credits_reset_at: Utc::now() + Duration::days(3),
    };
    InfluencerRepo::create(pool, &input, &[]).await.unwrap()
}

pub async fn verified_influencer(pool: &PgPool, username: &str, phone: &str) -> Influencer {
    let inf = influencer(pool, username, phone).await;
    InfluencerRepo::set_verified(pool, inf.id, true).await.unwrap();
    InfluencerRepo::find_by_id(pool, inf.id).await.unwrap().unwrap()
}

/// A brand with a verified email and the shared test password.
pub async fn brand(pool: &PgPool, username: &str) -> Brand {
    let input = CreateBrand {
        brand_name: format!("{username} Pvt Ltd"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        phone: None,
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
    };
    let brand = BrandRepo::create(pool, &input).await.unwrap();
    BrandRepo::set_email_verified(pool, brand.id).await.unwrap();
    BrandRepo::find_by_id(pool, brand.id).await.unwrap().unwrap()
}

pub async fn verified_brand(pool: &PgPool, username: &str) -> Brand {
    let brand = brand(pool, username).await;
    BrandRepo::set_verified(pool, brand.id, true).await.unwrap();
    BrandRepo::find_by_id(pool, brand.id).await.unwrap().unwrap()
}

pub async fn admin(pool: &PgPool, email: &str) -> Admin {
    AdminRepo::create(
        pool,
        &CreateAdmin {
            name: "Ops".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap()
}

/// A minimal valid campaign body for `POST /campaigns`.
pub fn campaign_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "Launch of our monsoon collection",
        "deliverables": "1 reel, 2 stories",
        "campaign_type": "paid",
        "budget_per_influencer": 5000,
    })
}
