//! Handlers for the influencer's campaign invitations (`/invitations`).

use axum::extract::{Path, Query, State};
use axum::Json;
use influx_core::campaign::{INVITATION_ACCEPTED, INVITATION_DECLINED};
use influx_core::types::DbId;
use influx_db::models::invitation::{CampaignInvitation, MyInvitationView};
use influx_db::repositories::{CampaignRepo, InvitationRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::influencer;
use crate::middleware::rbac::RequireInfluencer;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::services::notify::{self, Notice, KIND_INVITATION_RESPONDED};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    /// `accepted` or `declined`.
    pub status: String,
}

/// GET /api/v1/invitations/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<MyInvitationView>>>> {
    let items = InvitationRepo::list_for_influencer(
        &state.pool,
        user.account_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/invitations/{id}/respond
///
/// Accepting does not apply; the influencer still applies to the campaign,
/// bypassing targeting and early access. Declining removes that bypass.
pub async fn respond(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<CampaignInvitation>>> {
    let status = match input.status.as_str() {
        INVITATION_ACCEPTED => INVITATION_ACCEPTED,
        INVITATION_DECLINED => INVITATION_DECLINED,
        other => {
            return Err(AppError::validation(format!(
                "Invalid response '{other}'. Must be one of: {INVITATION_ACCEPTED}, {INVITATION_DECLINED}"
            )))
        }
    };

    let invitation = InvitationRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|i| i.influencer_id == user.account_id)
        .ok_or(AppError::not_found("Invitation", id))?;

    let updated = InvitationRepo::respond(&state.pool, id, user.account_id, status)
        .await?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "Invitation was already {}",
                invitation.status
            ))
        })?;
    tracing::info!(invitation_id = id, status, "Invitation answered");

    if let Some(campaign) = CampaignRepo::find_by_id(&state.pool, updated.campaign_id).await? {
        let me = influencer::load(&state, user.account_id).await?;
        notify::brand_by_id(
            &state,
            campaign.brand_id,
            Notice::new(
                KIND_INVITATION_RESPONDED,
                "Invitation answered",
                format!("{} {} your invitation to {}", me.name, status, campaign.name),
            )
            .with_data(serde_json::json!({
                "campaign_id": campaign.id,
                "invitation_id": id,
                "status": status,
            })),
        )
        .await;
    }

    Ok(Json(DataResponse { data: updated }))
}
