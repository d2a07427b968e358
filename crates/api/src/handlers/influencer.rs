//! Handlers for the `/influencers` resource.
//!
//! `/influencers/me/*` is the signed-in influencer's own profile. Every
//! mutation re-evaluates profile completion through
//! [`profile::sync_influencer`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use influx_core::accounts::AccountKind;
use influx_core::campaign::{validate_gender, MIN_TARGET_AGE};
use influx_core::credits::CreditBalance;
use influx_core::eligibility::age_on;
use influx_core::otp::{OtpPurpose, OTP_EXPIRY_MINS};
use influx_core::profile_completion::ProfileCompletion;
use influx_core::review::PROFILE_INFLUENCER;
use influx_core::types::{Date, DbId};
use influx_core::validation::{normalize_email, normalize_phone, validate_bio, validate_link};
use influx_db::models::experience::Experience;
use influx_db::models::influencer::{Influencer, InfluencerPublic, UpdateInfluencer};
use influx_db::models::profile_review::ProfileReview;
use influx_db::repositories::{ExperienceRepo, InfluencerRepo, ProfileReviewRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::non_empty;
use crate::handlers::lookup::{checked_city_ids, checked_niche_ids};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireInfluencer;
use crate::response::DataResponse;
use crate::services::{credits, otp, profile};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// The signed-in influencer's own view of their profile.
#[derive(Debug, Serialize)]
pub struct InfluencerMe {
    #[serde(flatten)]
    pub influencer: Influencer,
    pub niche_ids: Vec<DbId>,
    pub completion: ProfileCompletion,
    pub credits: CreditBalance,
    pub is_pro: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInfluencerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub city_id: Option<DbId>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    /// Per-platform rates, e.g. `{"instagram_reel": 5000}`.
    pub collaboration_costs: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub completion: ProfileCompletion,
    pub is_verified: bool,
    pub latest_review: Option<ProfileReview>,
}

#[derive(Debug, Deserialize)]
pub struct NichesRequest {
    pub niche_ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppOtpRequest {
    pub whatsapp_number: String,
}

#[derive(Debug, Serialize)]
pub struct WhatsAppOtpSent {
    pub whatsapp_number: String,
    pub expires_in_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppVerifyRequest {
    pub whatsapp_number: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct DeviceTokenRequest {
    /// `null` or blank clears the token.
    pub device_token: Option<String>,
}

/// Profile as seen by brands and admins.
#[derive(Debug, Serialize)]
pub struct InfluencerProfileView {
    #[serde(flatten)]
    pub profile: InfluencerPublic,
    pub niche_ids: Vec<DbId>,
    pub experiences: Vec<Experience>,
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /api/v1/influencers/me
pub async fn get_me(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<InfluencerMe>>> {
    let influencer = load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: me_view(&state, influencer).await?,
    }))
}

/// PUT /api/v1/influencers/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<UpdateInfluencerRequest>,
) -> AppResult<Json<DataResponse<InfluencerMe>>> {
    let update = validate_update(&state, input).await?;
    let influencer = InfluencerRepo::update(&state.pool, user.account_id, &update)
        .await?
        .ok_or(AppError::not_found("Influencer", user.account_id))?;

    profile::sync_influencer(&state, &influencer).await?;
    // Re-read so the completion flag reflects the sync.
    let influencer = load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: me_view(&state, influencer).await?,
    }))
}

/// GET /api/v1/influencers/me/completion
pub async fn completion(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<CompletionResponse>>> {
    let influencer = load(&state, user.account_id).await?;
    let latest_review =
        ProfileReviewRepo::latest_for_profile(&state.pool, PROFILE_INFLUENCER, influencer.id)
            .await?;
    Ok(Json(DataResponse {
        data: CompletionResponse {
            completion: profile::influencer_completion(&influencer),
            is_verified: influencer.is_verified,
            latest_review,
        },
    }))
}

/// PUT /api/v1/influencers/me/niches
///
/// Replace the influencer's niches. At least one is required.
pub async fn set_niches(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<NichesRequest>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let niche_ids = checked_niche_ids(&state, &input.niche_ids, true).await?;
    InfluencerRepo::set_niches(&state.pool, user.account_id, &niche_ids).await?;

    let influencer = load(&state, user.account_id).await?;
    profile::sync_influencer(&state, &influencer).await?;
    Ok(Json(DataResponse { data: niche_ids }))
}

/// POST /api/v1/influencers/me/whatsapp/otp
pub async fn whatsapp_otp(
    State(state): State<AppState>,
    RequireInfluencer(_user): RequireInfluencer,
    Json(input): Json<WhatsAppOtpRequest>,
) -> AppResult<Json<DataResponse<WhatsAppOtpSent>>> {
    let number = normalize_phone(&input.whatsapp_number)?;
    let code = otp::issue(&state, &number, OtpPurpose::WhatsappVerify).await?;
    state.notifier.send_otp_whatsapp(&number, &code).await?;

    Ok(Json(DataResponse {
        data: WhatsAppOtpSent {
            whatsapp_number: number,
            expires_in_secs: OTP_EXPIRY_MINS * 60,
        },
    }))
}

/// POST /api/v1/influencers/me/whatsapp/verify
pub async fn whatsapp_verify(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<WhatsAppVerifyRequest>,
) -> AppResult<Json<DataResponse<InfluencerMe>>> {
    let number = normalize_phone(&input.whatsapp_number)?;
    otp::verify(&state, &number, OtpPurpose::WhatsappVerify, &input.otp).await?;

    let influencer = InfluencerRepo::set_whatsapp_verified(&state.pool, user.account_id, &number)
        .await?
        .ok_or(AppError::not_found("Influencer", user.account_id))?;
    tracing::info!(influencer_id = influencer.id, "WhatsApp number verified");

    profile::sync_influencer(&state, &influencer).await?;
    let influencer = load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: me_view(&state, influencer).await?,
    }))
}

/// PUT /api/v1/influencers/me/device-token
pub async fn device_token(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<DeviceTokenRequest>,
) -> AppResult<StatusCode> {
    let token = non_empty(input.device_token.as_deref());
    InfluencerRepo::set_device_token(&state.pool, user.account_id, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Other viewers
// ---------------------------------------------------------------------------

/// GET /api/v1/influencers/{id}
///
/// Brands see verified profiles only; admins see any active profile.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InfluencerProfileView>>> {
    if user.kind == AccountKind::Influencer {
        return Err(AppError::forbidden("brand or admin account required"));
    }

    let influencer = InfluencerRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|i| i.is_active)
        .filter(|i| i.is_verified || user.kind == AccountKind::Admin)
        .ok_or(AppError::not_found("Influencer", id))?;

    let niche_ids = InfluencerRepo::niche_ids(&state.pool, id).await?;
    let experiences = ExperienceRepo::list_for_influencer(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: InfluencerProfileView {
            profile: influencer.into(),
            niche_ids,
            experiences,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load(state: &AppState, id: DbId) -> AppResult<Influencer> {
    InfluencerRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|i| i.is_active)
        .ok_or(AppError::not_found("Influencer", id))
}

async fn me_view(state: &AppState, influencer: Influencer) -> AppResult<InfluencerMe> {
    let now = Utc::now();
    let niche_ids = InfluencerRepo::niche_ids(&state.pool, influencer.id).await?;
    let credits = credits::current_balance(&state.pool, &influencer, now).await?;
    let is_pro = credits::is_pro(&state.pool, influencer.id, now).await?;
    let completion = profile::influencer_completion(&influencer);
    Ok(InfluencerMe {
        influencer,
        niche_ids,
        completion,
        credits,
        is_pro,
    })
}

/// Validate an edit and map it onto the repository DTO.
async fn validate_update(
    state: &AppState,
    input: UpdateInfluencerRequest,
) -> AppResult<UpdateInfluencer> {
    let name = match input.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Name cannot be blank"));
            }
            Some(name)
        }
        None => None,
    };
    let email = match non_empty(input.email.as_deref()) {
        Some(email) => Some(normalize_email(email)?),
        None => None,
    };
    if let Some(gender) = &input.gender {
        validate_gender(gender).map_err(AppError::validation)?;
    }
    if let Some(dob) = input.date_of_birth {
        if age_on(dob, Utc::now().date_naive()) < MIN_TARGET_AGE {
            return Err(AppError::validation(format!(
                "You must be at least {MIN_TARGET_AGE} years old"
            )));
        }
    }
    if let Some(bio) = &input.bio {
        validate_bio(bio)?;
    }
    if let Some(city_id) = input.city_id {
        checked_city_ids(state, &[city_id]).await?;
    }
    for (field, value) in [
        ("instagram_url", &input.instagram_url),
        ("youtube_url", &input.youtube_url),
        ("facebook_url", &input.facebook_url),
        ("linkedin_url", &input.linkedin_url),
        ("twitter_url", &input.twitter_url),
    ] {
        if let Some(v) = value {
            validate_link(field, v)?;
        }
    }
    if let Some(costs) = &input.collaboration_costs {
        validate_costs(costs)?;
    }

    Ok(UpdateInfluencer {
        name,
        email,
        gender: input.gender,
        date_of_birth: input.date_of_birth,
        bio: input.bio.map(|b| b.trim().to_string()),
        city_id: input.city_id,
        instagram_url: input.instagram_url.map(|v| v.trim().to_string()),
        youtube_url: input.youtube_url.map(|v| v.trim().to_string()),
        facebook_url: input.facebook_url.map(|v| v.trim().to_string()),
        linkedin_url: input.linkedin_url.map(|v| v.trim().to_string()),
        twitter_url: input.twitter_url.map(|v| v.trim().to_string()),
        collaboration_costs: input.collaboration_costs,
    })
}

/// Costs must be an object of platform name to non-negative number.
fn validate_costs(costs: &serde_json::Value) -> AppResult<()> {
    let map = costs
        .as_object()
        .ok_or_else(|| AppError::validation("collaboration_costs must be an object"))?;
    for (platform, value) in map {
        match value.as_f64() {
            Some(v) if v >= 0.0 => {}
            _ => {
                return Err(AppError::validation(format!(
                    "collaboration_costs.{platform} must be a non-negative number"
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn costs_accept_non_negative_numbers() {
        assert!(validate_costs(&json!({"instagram_reel": 5000, "youtube_video": 0})).is_ok());
    }

    #[test]
    fn costs_reject_bad_shapes() {
        assert!(validate_costs(&json!([100])).is_err());
        assert!(validate_costs(&json!({"instagram_reel": -1})).is_err());
        assert!(validate_costs(&json!({"instagram_reel": "cheap"})).is_err());
    }
}
