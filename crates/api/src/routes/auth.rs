//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /influencer/otp               -> influencer_request_otp
/// POST /influencer/signup            -> influencer_signup
/// POST /influencer/login             -> influencer_login
/// POST /brand/signup                 -> brand_signup
/// POST /brand/resend-verification    -> brand_resend_verification
/// POST /brand/verify-email           -> brand_verify_email
/// POST /brand/login                  -> brand_login
/// POST /brand/forgot-password        -> brand_forgot_password
/// POST /brand/reset-password         -> brand_reset_password
/// POST /admin/login                  -> admin_login
/// POST /refresh                      -> refresh
/// POST /logout                       -> logout (requires auth)
/// GET  /username-available           -> username_available
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/influencer/otp", post(auth::influencer_request_otp))
        .route("/influencer/signup", post(auth::influencer_signup))
        .route("/influencer/login", post(auth::influencer_login))
        .route("/brand/signup", post(auth::brand_signup))
        .route(
            "/brand/resend-verification",
            post(auth::brand_resend_verification),
        )
        .route("/brand/verify-email", post(auth::brand_verify_email))
        .route("/brand/login", post(auth::brand_login))
        .route("/brand/forgot-password", post(auth::brand_forgot_password))
        .route("/brand/reset-password", post(auth::brand_reset_password))
        .route("/admin/login", post(auth::admin_login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/username-available", get(auth::username_available))
}
