//! Handlers for `/influencers/me/experiences`: past collaborations shown on
//! the influencer's public profile.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use influx_core::types::{Date, DbId};
use influx_core::validation::validate_link;
use influx_db::models::experience::{CreateExperience, Experience, UpdateExperience};
use influx_db::repositories::ExperienceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::lookup::checked_niche_ids;
use crate::middleware::rbac::RequireInfluencer;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_DESCRIPTION_LENGTH: usize = 2_000;

#[derive(Debug, Deserialize)]
pub struct CreateExperienceRequest {
    pub campaign_name: String,
    pub brand_name: String,
    pub niche_id: Option<DbId>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub started_on: Option<Date>,
    pub ended_on: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExperienceRequest {
    pub campaign_name: Option<String>,
    pub brand_name: Option<String>,
    pub niche_id: Option<DbId>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub started_on: Option<Date>,
    pub ended_on: Option<Date>,
}

/// GET /api/v1/influencers/me/experiences
pub async fn list(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<Vec<Experience>>>> {
    let items = ExperienceRepo::list_for_influencer(&state.pool, user.account_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/influencers/me/experiences
pub async fn create(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<CreateExperienceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Experience>>)> {
    let campaign_name = required("campaign_name", &input.campaign_name)?;
    let brand_name = required("brand_name", &input.brand_name)?;
    validate_common(
        &state,
        input.niche_id,
        input.description.as_deref(),
        input.link.as_deref(),
    )
    .await?;
    check_dates(input.started_on, input.ended_on)?;

    let experience = ExperienceRepo::create(
        &state.pool,
        user.account_id,
        &CreateExperience {
            campaign_name,
            brand_name,
            niche_id: input.niche_id,
            description: input.description,
            link: input.link,
            started_on: input.started_on,
            ended_on: input.ended_on,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: experience })))
}

/// PUT /api/v1/influencers/me/experiences/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExperienceRequest>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let campaign_name = input
        .campaign_name
        .as_deref()
        .map(|v| required("campaign_name", v))
        .transpose()?;
    let brand_name = input
        .brand_name
        .as_deref()
        .map(|v| required("brand_name", v))
        .transpose()?;
    validate_common(
        &state,
        input.niche_id,
        input.description.as_deref(),
        input.link.as_deref(),
    )
    .await?;
    if input.started_on.is_some() || input.ended_on.is_some() {
        let current = ExperienceRepo::list_for_influencer(&state.pool, user.account_id)
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(AppError::not_found("Experience", id))?;
        check_dates(
            input.started_on.or(current.started_on),
            input.ended_on.or(current.ended_on),
        )?;
    }

    let experience = ExperienceRepo::update(
        &state.pool,
        id,
        user.account_id,
        &UpdateExperience {
            campaign_name,
            brand_name,
            niche_id: input.niche_id,
            description: input.description,
            link: input.link,
            started_on: input.started_on,
            ended_on: input.ended_on,
        },
    )
    .await?
    .ok_or(AppError::not_found("Experience", id))?;
    Ok(Json(DataResponse { data: experience }))
}

/// DELETE /api/v1/influencers/me/experiences/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ExperienceRepo::soft_delete(&state.pool, id, user.account_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Experience", id))
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

async fn validate_common(
    state: &AppState,
    niche_id: Option<DbId>,
    description: Option<&str>,
    link: Option<&str>,
) -> AppResult<()> {
    if let Some(niche_id) = niche_id {
        checked_niche_ids(state, &[niche_id], false).await?;
    }
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH) {
        return Err(AppError::validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    if let Some(link) = link {
        validate_link("link", link)?;
    }
    Ok(())
}

fn check_dates(started_on: Option<Date>, ended_on: Option<Date>) -> AppResult<()> {
    match (started_on, ended_on) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(
            "ended_on cannot be before started_on",
        )),
        _ => Ok(()),
    }
}
