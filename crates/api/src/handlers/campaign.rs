//! Handlers for the `/campaigns` resource.
//!
//! Brands create and manage campaigns, review applicants and send
//! invitations. Influencers discover live campaigns they qualify for and
//! apply, spending one weekly credit per application.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use influx_core::accounts::AccountKind;
use influx_core::campaign::{
    validate_campaign_type, validate_targeting, ApplicationStatus, CampaignStatus, Targeting,
    VALID_APPLICATION_STATUSES, MAX_INVITES_PER_REQUEST,
};
use influx_core::credits::CreditBalance;
use influx_core::eligibility::{self, age_on, CampaignFacts, InfluencerFacts, EARLY_ACCESS_HOURS};
use influx_core::types::{DbId, Timestamp};
use influx_db::models::application::{ApplicantView, CampaignApplication, CreateApplication};
use influx_db::models::campaign::{Campaign, CreateCampaign, DiscoveryFilter, UpdateCampaign};
use influx_db::models::invitation::CampaignInvitation;
use influx_db::repositories::application_repo::ApplyOutcome;
use influx_db::repositories::{ApplicationRepo, CampaignRepo, InfluencerRepo, InvitationRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::lookup::{checked_city_ids, checked_niche_ids};
use crate::handlers::{brand, influencer};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireBrand, RequireInfluencer};
use crate::query::{clamp_limit, clamp_offset, StatusPageParams};
use crate::response::DataResponse;
use crate::services::credits;
use crate::services::notify::{
    self, Notice, KIND_APPLICATION_RECEIVED, KIND_APPLICATION_UPDATED, KIND_CAMPAIGN_INVITATION,
};
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 200;
const MAX_TEXT_LENGTH: usize = 5_000;
const MAX_COVER_LETTER_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub description: String,
    pub deliverables: Option<String>,
    pub campaign_type: String,
    pub budget_per_influencer: Option<i64>,
    #[serde(default = "default_true")]
    pub is_open_to_all_ages: bool,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    #[serde(default = "default_true")]
    pub is_open_to_all_genders: bool,
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default = "default_true")]
    pub is_pan_india: bool,
    #[serde(default)]
    pub is_invite_only: bool,
    pub application_deadline: Option<Timestamp>,
    #[serde(default)]
    pub niche_ids: Vec<DbId>,
    #[serde(default)]
    pub city_ids: Vec<DbId>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deliverables: Option<String>,
    pub budget_per_influencer: Option<i64>,
    pub is_open_to_all_ages: Option<bool>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: Option<bool>,
    pub genders: Option<Vec<String>>,
    pub is_pan_india: Option<bool>,
    pub is_invite_only: Option<bool>,
    pub application_deadline: Option<Timestamp>,
    pub niche_ids: Option<Vec<DbId>>,
    pub city_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub influencer_ids: Vec<DbId>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InviteResult {
    pub invited: Vec<CampaignInvitation>,
    /// Requested ids that already held an invitation.
    pub already_invited: Vec<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverParams {
    pub search: Option<String>,
    pub niche_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub application: CampaignApplication,
    pub credits: CreditBalance,
}

// ---------------------------------------------------------------------------
// Brand: campaign management
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns
///
/// Creates a draft. Only verified brands may create campaigns.
pub async fn create(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    let owner = brand::load(&state, user.account_id).await?;
    if !owner.is_verified {
        return Err(AppError::forbidden(
            "Your brand profile must be verified before creating campaigns",
        ));
    }

    let name = checked_text("name", &input.name, MAX_NAME_LENGTH)?;
    let description = checked_text("description", &input.description, MAX_TEXT_LENGTH)?;
    validate_campaign_type(&input.campaign_type).map_err(AppError::validation)?;
    check_budget(input.budget_per_influencer)?;
    check_deadline(input.application_deadline)?;
    let niche_ids = checked_niche_ids(&state, &input.niche_ids, false).await?;
    let city_ids = checked_city_ids(&state, &input.city_ids).await?;
    validate_targeting(&Targeting {
        is_open_to_all_ages: input.is_open_to_all_ages,
        min_age: input.min_age,
        max_age: input.max_age,
        is_open_to_all_genders: input.is_open_to_all_genders,
        genders: &input.genders,
        is_pan_india: input.is_pan_india,
        city_count: city_ids.len(),
    })
    .map_err(AppError::validation)?;

    let campaign = CampaignRepo::create(
        &state.pool,
        owner.id,
        &CreateCampaign {
            name,
            description,
            deliverables: input.deliverables,
            campaign_type: input.campaign_type,
            budget_per_influencer: input.budget_per_influencer,
            is_open_to_all_ages: input.is_open_to_all_ages,
            min_age: input.min_age,
            max_age: input.max_age,
            is_open_to_all_genders: input.is_open_to_all_genders,
            genders: input.genders,
            is_pan_india: input.is_pan_india,
            is_invite_only: input.is_invite_only,
            application_deadline: input.application_deadline,
            niche_ids,
            city_ids,
        },
    )
    .await?;

    tracing::info!(campaign_id = campaign.id, brand_id = owner.id, "Campaign created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns/mine?status=&limit=&offset=
pub async fn mine(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Query(params): Query<StatusPageParams>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    if let Some(status) = &params.status {
        CampaignStatus::from_str_value(status).map_err(AppError::validation)?;
    }
    let campaigns = CampaignRepo::list_by_brand(
        &state.pool,
        user.account_id,
        params.status.as_deref(),
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
///
/// Owners and admins see any campaign; other accounts see published ones.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = find_live(&state, id).await?;
    let visible = match user.kind {
        AccountKind::Admin => true,
        AccountKind::Brand => campaign.brand_id == user.account_id || campaign.published_at.is_some(),
        AccountKind::Influencer => campaign.published_at.is_some(),
    };
    if !visible {
        return Err(AppError::not_found("Campaign", id));
    }
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
///
/// Targeting is validated on the merged result so partial edits cannot
/// leave an inconsistent audience.
pub async fn update(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaignRequest>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let current = owned_campaign(&state, id, user.account_id).await?;
    let status = CampaignStatus::from_str_value(&current.status).map_err(AppError::InternalError)?;
    if status.is_terminal() {
        return Err(AppError::conflict(format!(
            "Cannot edit a {} campaign",
            current.status
        )));
    }

    let name = input
        .name
        .as_deref()
        .map(|n| checked_text("name", n, MAX_NAME_LENGTH))
        .transpose()?;
    let description = input
        .description
        .as_deref()
        .map(|d| checked_text("description", d, MAX_TEXT_LENGTH))
        .transpose()?;
    check_budget(input.budget_per_influencer)?;
    check_deadline(input.application_deadline)?;
    let niche_ids = match &input.niche_ids {
        Some(ids) => Some(checked_niche_ids(&state, ids, false).await?),
        None => None,
    };
    let city_ids = match &input.city_ids {
        Some(ids) => Some(checked_city_ids(&state, ids).await?),
        None => None,
    };

    let genders = input.genders.as_ref().unwrap_or(&current.genders);
    validate_targeting(&Targeting {
        is_open_to_all_ages: input.is_open_to_all_ages.unwrap_or(current.is_open_to_all_ages),
        min_age: input.min_age.or(current.min_age),
        max_age: input.max_age.or(current.max_age),
        is_open_to_all_genders: input
            .is_open_to_all_genders
            .unwrap_or(current.is_open_to_all_genders),
        genders,
        is_pan_india: input.is_pan_india.unwrap_or(current.is_pan_india),
        city_count: city_ids.as_ref().map_or(current.city_ids.len(), Vec::len),
    })
    .map_err(AppError::validation)?;

    let campaign = CampaignRepo::update(
        &state.pool,
        id,
        &UpdateCampaign {
            name,
            description,
            deliverables: input.deliverables,
            budget_per_influencer: input.budget_per_influencer,
            is_open_to_all_ages: input.is_open_to_all_ages,
            min_age: input.min_age,
            max_age: input.max_age,
            is_open_to_all_genders: input.is_open_to_all_genders,
            genders: input.genders,
            is_pan_india: input.is_pan_india,
            is_invite_only: input.is_invite_only,
            application_deadline: input.application_deadline,
            niche_ids,
            city_ids,
        },
    )
    .await?
    .ok_or(AppError::not_found("Campaign", id))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// POST /api/v1/campaigns/{id}/status
///
/// Moves a campaign through its lifecycle. Activation requires a verified
/// brand; the first activation starts the Pro early access window.
pub async fn set_status(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let next = CampaignStatus::from_str_value(&input.status).map_err(AppError::validation)?;
    let campaign = owned_campaign(&state, id, user.account_id).await?;
    let current =
        CampaignStatus::from_str_value(&campaign.status).map_err(AppError::InternalError)?;

    if !current.can_transition_to(next) {
        return Err(AppError::conflict(format!(
            "Cannot move campaign from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }
    if next == CampaignStatus::Active {
        let owner = brand::load(&state, user.account_id).await?;
        if !owner.is_verified {
            return Err(AppError::forbidden(
                "Your brand profile must be verified before publishing campaigns",
            ));
        }
    }

    if !CampaignRepo::set_status(&state.pool, id, current.as_str(), next.as_str()).await? {
        return Err(AppError::conflict("Campaign status changed concurrently, retry"));
    }
    tracing::info!(
        campaign_id = id,
        from = current.as_str(),
        to = next.as_str(),
        "Campaign status changed"
    );

    let campaign = find_live(&state, id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_campaign(&state, id, user.account_id).await?;
    if CampaignRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(campaign_id = id, "Campaign deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Campaign", id))
    }
}

/// GET /api/v1/campaigns/{id}/applications?status=&limit=&offset=
pub async fn list_applications(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path(id): Path<DbId>,
    Query(params): Query<StatusPageParams>,
) -> AppResult<Json<DataResponse<Vec<ApplicantView>>>> {
    owned_campaign(&state, id, user.account_id).await?;
    if let Some(status) = &params.status {
        if !VALID_APPLICATION_STATUSES.contains(&status.as_str()) {
            return Err(AppError::validation(format!(
                "Invalid application status '{status}'"
            )));
        }
    }
    let items = ApplicationRepo::list_for_campaign(
        &state.pool,
        id,
        params.status.as_deref(),
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/campaigns/{id}/applications/{application_id}
///
/// Brand review of an application. The influencer is notified.
pub async fn update_application(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path((id, application_id)): Path<(DbId, DbId)>,
    Json(input): Json<ApplicationStatusRequest>,
) -> AppResult<Json<DataResponse<CampaignApplication>>> {
    let campaign = owned_campaign(&state, id, user.account_id).await?;
    let next = ApplicationStatus::from_str_value(&input.status).map_err(AppError::validation)?;

    let application = ApplicationRepo::find_by_id(&state.pool, application_id)
        .await?
        .filter(|a| a.campaign_id == id)
        .ok_or(AppError::not_found("Application", application_id))?;
    let current =
        ApplicationStatus::from_str_value(&application.status).map_err(AppError::InternalError)?;

    if !current.brand_can_transition_to(next) {
        return Err(AppError::conflict(format!(
            "Cannot move application from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }
    let notes = input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let updated = ApplicationRepo::update_status(
        &state.pool,
        application_id,
        current.as_str(),
        next.as_str(),
        notes,
    )
    .await?
    .ok_or_else(|| AppError::conflict("Application changed concurrently, retry"))?;

    tracing::info!(
        application_id,
        campaign_id = id,
        status = next.as_str(),
        "Application status changed"
    );

    notify::influencer_by_id(
        &state,
        updated.influencer_id,
        Notice::new(
            KIND_APPLICATION_UPDATED,
            "Application update",
            format!(
                "Your application to {} is now {}",
                campaign.name,
                next.as_str().replace('_', " ")
            ),
        )
        .with_data(serde_json::json!({
            "campaign_id": id,
            "application_id": application_id,
            "status": next.as_str(),
        })),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/campaigns/{id}/invitations
///
/// Invite verified influencers. Each invitee is notified once.
pub async fn invite(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Path(id): Path<DbId>,
    Json(input): Json<InviteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<InviteResult>>)> {
    let campaign = owned_campaign(&state, id, user.account_id).await?;
    let status = CampaignStatus::from_str_value(&campaign.status).map_err(AppError::InternalError)?;
    if status.is_terminal() {
        return Err(AppError::conflict(format!(
            "Cannot invite to a {} campaign",
            campaign.status
        )));
    }

    let mut ids = input.influencer_ids.clone();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(AppError::validation("influencer_ids must not be empty"));
    }
    if ids.len() > MAX_INVITES_PER_REQUEST {
        return Err(AppError::validation(format!(
            "At most {MAX_INVITES_PER_REQUEST} influencers per request"
        )));
    }

    let mut invitees = Vec::with_capacity(ids.len());
    for influencer_id in &ids {
        let invitee = InfluencerRepo::find_by_id(&state.pool, *influencer_id)
            .await?
            .filter(|i| i.is_active && i.is_verified)
            .ok_or(AppError::not_found("Influencer", *influencer_id))?;
        invitees.push(invitee);
    }

    let message = input.message.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let invited = InvitationRepo::create_many(&state.pool, id, &ids, message).await?;
    let already_invited = ids
        .iter()
        .copied()
        .filter(|i| !invited.iter().any(|inv| inv.influencer_id == *i))
        .collect();

    tracing::info!(campaign_id = id, count = invited.len(), "Influencers invited");

    for invitation in &invited {
        if let Some(invitee) = invitees.iter().find(|i| i.id == invitation.influencer_id) {
            let notice = Notice::new(
                KIND_CAMPAIGN_INVITATION,
                "You're invited",
                format!("{} invited you to {}", campaign.brand_name, campaign.name),
            )
            .with_data(serde_json::json!({
                "campaign_id": id,
                "invitation_id": invitation.id,
            }));
            notify::influencer(&state, invitee, notice).await;
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InviteResult {
                invited,
                already_invited,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Influencer: discovery and applying
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns/discover?search=&niche_id=&city_id=&limit=&offset=
///
/// Live campaigns the caller is eligible for, newest first.
pub async fn discover(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Query(params): Query<DiscoverParams>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let now = Utc::now();
    let me = influencer::load(&state, user.account_id).await?;
    let niche_ids = InfluencerRepo::niche_ids(&state.pool, me.id).await?;
    let is_pro = credits::is_pro(&state.pool, me.id, now).await?;

    let filter = DiscoveryFilter {
        influencer_id: me.id,
        niche_ids,
        age: me.date_of_birth.map(|dob| age_on(dob, now.date_naive())),
        gender: me.gender.clone(),
        city_id: me.city_id,
        is_pro,
        early_access_cutoff: now - Duration::hours(EARLY_ACCESS_HOURS),
        search: params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        niche_filter: params.niche_id,
        city_filter: params.city_id,
        limit: clamp_limit(params.limit),
        offset: clamp_offset(params.offset),
    };
    let campaigns = CampaignRepo::discover(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/campaigns/{id}/apply
///
/// Applying requires a verified profile, passes the eligibility rules and
/// spends one weekly credit. The brand is notified.
pub async fn apply(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
    Json(input): Json<ApplyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApplyResponse>>)> {
    let now = Utc::now();

    let me = influencer::load(&state, user.account_id).await?;
    if !me.is_verified {
        return Err(AppError::forbidden(
            "Your profile must be verified before applying to campaigns",
        ));
    }
    let cover_letter = input
        .cover_letter
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    if cover_letter
        .as_deref()
        .is_some_and(|c| c.chars().count() > MAX_COVER_LETTER_LENGTH)
    {
        return Err(AppError::validation(format!(
            "Cover letter exceeds maximum length of {MAX_COVER_LETTER_LENGTH} characters"
        )));
    }
    if input.proposed_rate.is_some_and(|r| r < 0) {
        return Err(AppError::validation("proposed_rate cannot be negative"));
    }

    let campaign = find_live(&state, id).await?;
    let published_at = campaign
        .published_at
        .ok_or(AppError::not_found("Campaign", id))?;
    let niche_ids = InfluencerRepo::niche_ids(&state.pool, me.id).await?;
    let is_pro = credits::is_pro(&state.pool, me.id, now).await?;
    let is_invited = InvitationRepo::is_invited(&state.pool, id, me.id).await?;

    eligibility::evaluate(
        &InfluencerFacts {
            niche_ids: &niche_ids,
            date_of_birth: me.date_of_birth,
            gender: me.gender.as_deref(),
            city_id: me.city_id,
            is_pro,
            is_invited,
        },
        &CampaignFacts {
            is_live: is_accepting(&campaign, now),
            niche_ids: &campaign.niche_ids,
            is_open_to_all_ages: campaign.is_open_to_all_ages,
            min_age: campaign.min_age,
            max_age: campaign.max_age,
            is_open_to_all_genders: campaign.is_open_to_all_genders,
            genders: &campaign.genders,
            is_pan_india: campaign.is_pan_india,
            city_ids: &campaign.city_ids,
            is_invite_only: campaign.is_invite_only,
            published_at,
        },
        now,
    )
    .map_err(|reason| {
        tracing::debug!(influencer_id = me.id, campaign_id = id, ?reason, "Application refused");
        AppError::forbidden(reason.message())
    })?;

    let outcome = ApplicationRepo::create_charging_credit(
        &state.pool,
        &CreateApplication {
            campaign_id: id,
            influencer_id: me.id,
            cover_letter,
            proposed_rate: input.proposed_rate,
        },
        now,
    )
    .await?;

    let (application, balance) = match outcome {
        ApplyOutcome::Applied {
            application,
            balance,
        } => (application, balance),
        ApplyOutcome::NoCredits { reason, .. } => {
            return Err(AppError::validation(reason));
        }
    };

    tracing::info!(
        influencer_id = me.id,
        campaign_id = id,
        application_id = application.id,
        credits_left = balance.credits,
        "Application submitted"
    );

    notify::brand_by_id(
        &state,
        campaign.brand_id,
        Notice::new(
            KIND_APPLICATION_RECEIVED,
            "New application",
            format!("{} applied to {}", me.name, campaign.name),
        )
        .with_data(serde_json::json!({
            "campaign_id": id,
            "application_id": application.id,
            "influencer_id": me.id,
        })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ApplyResponse {
                application,
                credits: balance,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_live(state: &AppState, id: DbId) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.is_active)
        .ok_or(AppError::not_found("Campaign", id))
}

/// Load a campaign and check the caller owns it. Other brands get 404.
async fn owned_campaign(state: &AppState, id: DbId, brand_id: DbId) -> AppResult<Campaign> {
    let campaign = find_live(state, id).await?;
    if campaign.brand_id != brand_id {
        return Err(AppError::not_found("Campaign", id));
    }
    Ok(campaign)
}

/// Active, not soft-deleted, and before its application deadline.
pub(crate) fn is_accepting(campaign: &Campaign, now: Timestamp) -> bool {
    campaign.is_active
        && campaign.status == CampaignStatus::Active.as_str()
        && campaign.application_deadline.map_or(true, |d| d > now)
}

fn checked_text(field: &str, value: &str, max: usize) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if v.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum length of {max} characters"
        )));
    }
    Ok(v.to_string())
}

fn check_budget(budget: Option<i64>) -> AppResult<()> {
    if budget.is_some_and(|b| b < 0) {
        return Err(AppError::validation("budget_per_influencer cannot be negative"));
    }
    Ok(())
}

fn check_deadline(deadline: Option<Timestamp>) -> AppResult<()> {
    if deadline.is_some_and(|d| d <= Utc::now()) {
        return Err(AppError::validation("application_deadline must be in the future"));
    }
    Ok(())
}
