//! Route definitions for the `/admin` resource.
//!
//! Every handler requires the admin role via the `RequireAdmin` extractor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /profile-reviews                -> list_reviews
/// GET    /profile-reviews/{id}           -> get_review
/// POST   /profile-reviews/{id}/approve   -> approve_review
/// POST   /profile-reviews/{id}/reject    -> reject_review
/// GET    /redemptions                    -> list_redemptions
/// POST   /redemptions/{id}/paid          -> mark_paid
/// POST   /redemptions/{id}/failed        -> mark_failed
/// POST   /influencers/{id}/pro           -> grant_pro
/// DELETE /influencers/{id}/pro           -> cancel_pro
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile-reviews", get(admin::list_reviews))
        .route("/profile-reviews/{id}", get(admin::get_review))
        .route(
            "/profile-reviews/{id}/approve",
            post(admin::approve_review),
        )
        .route("/profile-reviews/{id}/reject", post(admin::reject_review))
        .route("/redemptions", get(admin::list_redemptions))
        .route("/redemptions/{id}/paid", post(admin::mark_paid))
        .route("/redemptions/{id}/failed", post(admin::mark_failed))
        .route(
            "/influencers/{id}/pro",
            post(admin::grant_pro).delete(admin::cancel_pro),
        )
}
