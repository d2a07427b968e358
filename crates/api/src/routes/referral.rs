//! Route definitions for credits, referrals, UPI accounts and Pro status.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::referral;
use crate::state::AppState;

/// Routes mounted at `/credits`.
///
/// ```text
/// GET /me   -> credits_me
/// ```
pub fn credits_router() -> Router<AppState> {
    Router::new().route("/me", get(referral::credits_me))
}

/// Routes mounted at `/referrals`.
///
/// ```text
/// GET  /me       -> referrals_me
/// POST /redeem   -> redeem
/// ```
pub fn referrals_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(referral::referrals_me))
        .route("/redeem", post(referral::redeem))
}

/// Routes mounted at `/upi`.
///
/// ```text
/// GET    /                -> list_upi
/// POST   /                -> create_upi
/// PUT    /{id}/primary    -> set_primary_upi
/// DELETE /{id}            -> delete_upi
/// ```
pub fn upi_router() -> Router<AppState> {
    Router::new()
        .route("/", get(referral::list_upi).post(referral::create_upi))
        .route("/{id}/primary", put(referral::set_primary_upi))
        .route("/{id}", delete(referral::delete_upi))
}

/// Routes mounted at `/pro`.
///
/// ```text
/// GET /me   -> pro_me
/// ```
pub fn pro_router() -> Router<AppState> {
    Router::new().route("/me", get(referral::pro_me))
}
