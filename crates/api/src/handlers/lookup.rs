//! Handlers for seeded lookup data (niches, cities) plus the validation
//! helpers other handlers use for niche and city ids.

use axum::extract::State;
use axum::Json;
use influx_core::types::DbId;
use influx_db::models::lookup::{City, Niche};
use influx_db::repositories::{CityRepo, NicheRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/niches
pub async fn list_niches(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Niche>>>> {
    let niches = NicheRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: niches }))
}

/// GET /api/v1/cities
pub async fn list_cities(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<City>>>> {
    let cities = CityRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// Deduplicate `ids` and check each names an active niche.
pub(crate) async fn checked_niche_ids(
    state: &AppState,
    ids: &[DbId],
    required: bool,
) -> AppResult<Vec<DbId>> {
    let ids = dedup(ids);
    if ids.is_empty() {
        if required {
            return Err(AppError::validation("Select at least one niche"));
        }
        return Ok(ids);
    }
    let found = NicheRepo::count_active(&state.pool, &ids).await?;
    if found != ids.len() as i64 {
        return Err(AppError::validation("One or more niches do not exist"));
    }
    Ok(ids)
}

/// Deduplicate `ids` and check each names a known city.
pub(crate) async fn checked_city_ids(state: &AppState, ids: &[DbId]) -> AppResult<Vec<DbId>> {
    let ids = dedup(ids);
    if ids.is_empty() {
        return Ok(ids);
    }
    let found = CityRepo::count_existing(&state.pool, &ids).await?;
    if found != ids.len() as i64 {
        return Err(AppError::validation("One or more cities do not exist"));
    }
    Ok(ids)
}

fn dedup(ids: &[DbId]) -> Vec<DbId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_sorts_and_removes_duplicates() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }
}
