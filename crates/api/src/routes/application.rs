//! Route definitions for the `/applications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::application;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET  /mine            -> mine
/// POST /{id}/withdraw   -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(application::mine))
        .route("/{id}/withdraw", post(application::withdraw))
}
