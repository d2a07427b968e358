//! Route definitions for the `/brands` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{brand, upload};
use crate::state::AppState;

/// Routes mounted at `/brands`.
///
/// ```text
/// GET  /me                -> get_me
/// PUT  /me                -> update_me
/// GET  /me/completion     -> completion
/// PUT  /me/niches         -> set_niches
/// POST /me/logo           -> upload::brand_logo (multipart)
/// PUT  /me/device-token   -> device_token
/// GET  /{id}              -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(brand::get_me).put(brand::update_me))
        .route("/me/completion", get(brand::completion))
        .route("/me/niches", put(brand::set_niches))
        .route("/me/logo", post(upload::brand_logo))
        .route("/me/device-token", put(brand::device_token))
        .route("/{id}", get(brand::get_by_id))
}
