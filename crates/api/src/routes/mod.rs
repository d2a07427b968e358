pub mod admin;
pub mod application;
pub mod auth;
pub mod brand;
pub mod campaign;
pub mod health;
pub mod influencer;
pub mod invitation;
pub mod lookup;
pub mod notification;
pub mod referral;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /niches, /cities                                 reference data (public)
///
/// /auth
///     /influencer/{otp,signup,login}               phone OTP auth
///     /brand/{signup,login,verify-email,...}       email + password auth
///     /admin/login                                 admin auth
///     /refresh, /logout                            session rotation
///     /username-available                          availability check
///
/// /influencers
///     /me                                          profile, niches, images
///     /me/experiences/{id}                         work history
///     /{id}                                        public profile
///
/// /brands
///     /me                                          profile, niches, logo
///     /{id}                                        public profile
///
/// /campaigns
///     /, /mine, /discover                          create, list, discover
///     /{id}                                        get, update, delete
///     /{id}/status                                 lifecycle transitions
///     /{id}/apply                                  influencer applies
///     /{id}/applications/{application_id}          brand review
///     /{id}/invitations                            brand invites
///
/// /applications/mine, /{id}/withdraw               influencer side
/// /invitations/mine, /{id}/respond                 influencer side
///
/// /credits/me                                      weekly credits
/// /referrals/me, /redeem                           referral ledger
/// /upi, /{id}, /{id}/primary                       payout accounts
/// /pro/me                                          Pro status
///
/// /notifications, /read-all, /{id}/read            in-app feed
///
/// /admin
///     /profile-reviews/{id}/{approve,reject}       verification queue
///     /redemptions/{id}/{paid,failed}              payouts
///     /influencers/{id}/pro                        grant / cancel Pro
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public lookup lists.
        .merge(lookup::router())
        // Authentication for all three account kinds.
        .nest("/auth", auth::router())
        // Profiles.
        .nest("/influencers", influencer::router())
        .nest("/brands", brand::router())
        // Marketplace.
        .nest("/campaigns", campaign::router())
        .nest("/applications", application::router())
        .nest("/invitations", invitation::router())
        // Credits, referral rewards, payouts and Pro.
        .nest("/credits", referral::credits_router())
        .nest("/referrals", referral::referrals_router())
        .nest("/upi", referral::upi_router())
        .nest("/pro", referral::pro_router())
        // In-app notification feed.
        .nest("/notifications", notification::router())
        // Moderation and back office.
        .nest("/admin", admin::router())
}
