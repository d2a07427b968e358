//! Reference data routes. Public, no authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::lookup;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET /niches   -> list_niches
/// GET /cities   -> list_cities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/niches", get(lookup::list_niches))
        .route("/cities", get(lookup::list_cities))
}
