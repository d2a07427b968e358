//! Route definitions for the `/invitations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invitation;
use crate::state::AppState;

/// Routes mounted at `/invitations`.
///
/// ```text
/// GET  /mine           -> mine
/// POST /{id}/respond   -> respond
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(invitation::mine))
        .route("/{id}/respond", post(invitation::respond))
}
