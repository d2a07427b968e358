//! Handlers for the influencer's own applications (`/applications`).

use axum::extract::{Path, Query, State};
use axum::Json;
use influx_core::campaign::{ApplicationStatus, APPLICATION_APPLIED, APPLICATION_UNDER_REVIEW};
use influx_core::types::DbId;
use influx_db::models::application::{CampaignApplication, MyApplicationView};
use influx_db::repositories::ApplicationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireInfluencer;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Statuses from which an influencer may still withdraw.
const WITHDRAWABLE: &[&str] = &[APPLICATION_APPLIED, APPLICATION_UNDER_REVIEW];

/// GET /api/v1/applications/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<MyApplicationView>>>> {
    let items = ApplicationRepo::list_for_influencer(
        &state.pool,
        user.account_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/applications/{id}/withdraw
///
/// The spent credit is not refunded.
pub async fn withdraw(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignApplication>>> {
    let application = ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| a.influencer_id == user.account_id)
        .ok_or(AppError::not_found("Application", id))?;

    let status =
        ApplicationStatus::from_str_value(&application.status).map_err(AppError::InternalError)?;
    if !status.can_withdraw() {
        return Err(AppError::conflict(format!(
            "Cannot withdraw an application that is {}",
            status.as_str()
        )));
    }

    let withdrawn = ApplicationRepo::withdraw(&state.pool, id, user.account_id, WITHDRAWABLE)
        .await?
        .ok_or_else(|| AppError::conflict("Application changed concurrently, retry"))?;

    tracing::info!(
        application_id = id,
        influencer_id = user.account_id,
        "Application withdrawn"
    );
    Ok(Json(DataResponse { data: withdrawn }))
}
