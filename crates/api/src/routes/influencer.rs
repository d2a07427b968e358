//! Route definitions for the `/influencers` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{experience, influencer, upload};
use crate::state::AppState;

/// Routes mounted at `/influencers`.
///
/// ```text
/// GET    /me                     -> get_me
/// PUT    /me                     -> update_me
/// GET    /me/completion          -> completion
/// PUT    /me/niches              -> set_niches
/// POST   /me/images              -> upload::influencer_images (multipart)
/// POST   /me/whatsapp/otp        -> whatsapp_otp
/// POST   /me/whatsapp/verify     -> whatsapp_verify
/// PUT    /me/device-token        -> device_token
/// GET    /me/experiences         -> experience::list
/// POST   /me/experiences         -> experience::create
/// PUT    /me/experiences/{id}    -> experience::update
/// DELETE /me/experiences/{id}    -> experience::delete
/// GET    /{id}                   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(influencer::get_me).put(influencer::update_me))
        .route("/me/completion", get(influencer::completion))
        .route("/me/niches", put(influencer::set_niches))
        .route("/me/images", post(upload::influencer_images))
        .route("/me/whatsapp/otp", post(influencer::whatsapp_otp))
        .route("/me/whatsapp/verify", post(influencer::whatsapp_verify))
        .route("/me/device-token", put(influencer::device_token))
        .route(
            "/me/experiences",
            get(experience::list).post(experience::create),
        )
        .route(
            "/me/experiences/{id}",
            put(experience::update).delete(experience::delete),
        )
        .route("/{id}", get(influencer::get_by_id))
}
