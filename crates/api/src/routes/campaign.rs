//! Route definitions for the `/campaigns` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::campaign;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /mine                              -> mine
/// GET    /discover                          -> discover
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/status                       -> set_status
/// POST   /{id}/apply                        -> apply
/// GET    /{id}/applications                 -> list_applications
/// PUT    /{id}/applications/{application_id} -> update_application
/// POST   /{id}/invitations                  -> invite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(campaign::create))
        .route("/mine", get(campaign::mine))
        .route("/discover", get(campaign::discover))
        .route(
            "/{id}",
            get(campaign::get_by_id)
                .put(campaign::update)
                .delete(campaign::delete),
        )
        .route("/{id}/status", post(campaign::set_status))
        .route("/{id}/apply", post(campaign::apply))
        .route("/{id}/applications", get(campaign::list_applications))
        .route(
            "/{id}/applications/{application_id}",
            put(campaign::update_application),
        )
        .route("/{id}/invitations", post(campaign::invite))
}
