//! Handlers for the `/brands` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use influx_core::accounts::AccountKind;
use influx_core::profile_completion::ProfileCompletion;
use influx_core::review::PROFILE_BRAND;
use influx_core::types::{DbId, Timestamp};
use influx_core::validation::{normalize_email, normalize_phone, validate_bio, validate_link};
use influx_db::models::brand::{Brand, BrandResponse, UpdateBrand};
use influx_db::repositories::{BrandRepo, ProfileReviewRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::auth::non_empty;
use crate::handlers::influencer::{CompletionResponse, DeviceTokenRequest, NichesRequest};
use crate::handlers::lookup::checked_niche_ids;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireBrand;
use crate::response::DataResponse;
use crate::services::profile;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct BrandMe {
    #[serde(flatten)]
    pub brand: BrandResponse,
    pub niche_ids: Vec<DbId>,
    pub completion: ProfileCompletion,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBrandRequest {
    pub brand_name: Option<String>,
    pub phone: Option<String>,
    pub legal_entity_name: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub brand_bio: Option<String>,
    pub poc_name: Option<String>,
    pub poc_designation: Option<String>,
    pub poc_email: Option<String>,
    pub poc_contact_number: Option<String>,
}

/// What influencers and other brands see. Contact details stay private.
#[derive(Debug, Serialize)]
pub struct BrandPublic {
    pub id: DbId,
    pub brand_name: String,
    pub username: String,
    pub company_website: Option<String>,
    pub brand_bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_verified: bool,
    pub niche_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /api/v1/brands/me
pub async fn get_me(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
) -> AppResult<Json<DataResponse<BrandMe>>> {
    let brand = load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: me_view(&state, brand).await?,
    }))
}

/// PUT /api/v1/brands/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Json(input): Json<UpdateBrandRequest>,
) -> AppResult<Json<DataResponse<BrandMe>>> {
    let update = validate_update(input)?;
    let brand = BrandRepo::update(&state.pool, user.account_id, &update)
        .await?
        .ok_or(AppError::not_found("Brand", user.account_id))?;

    profile::sync_brand(&state, &brand).await?;
    let brand = load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: me_view(&state, brand).await?,
    }))
}

/// GET /api/v1/brands/me/completion
pub async fn completion(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
) -> AppResult<Json<DataResponse<CompletionResponse>>> {
    let brand = load(&state, user.account_id).await?;
    let niche_count = BrandRepo::niche_ids(&state.pool, brand.id).await?.len();
    let latest_review =
        ProfileReviewRepo::latest_for_profile(&state.pool, PROFILE_BRAND, brand.id).await?;
    Ok(Json(DataResponse {
        data: CompletionResponse {
            completion: profile::brand_completion(&brand, niche_count),
            is_verified: brand.is_verified,
            latest_review,
        },
    }))
}

/// PUT /api/v1/brands/me/niches
pub async fn set_niches(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Json(input): Json<NichesRequest>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let niche_ids = checked_niche_ids(&state, &input.niche_ids, true).await?;
    BrandRepo::set_niches(&state.pool, user.account_id, &niche_ids).await?;

    let brand = load(&state, user.account_id).await?;
    profile::sync_brand(&state, &brand).await?;
    Ok(Json(DataResponse { data: niche_ids }))
}

/// PUT /api/v1/brands/me/device-token
pub async fn device_token(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    Json(input): Json<DeviceTokenRequest>,
) -> AppResult<StatusCode> {
    let token = non_empty(input.device_token.as_deref());
    BrandRepo::set_device_token(&state.pool, user.account_id, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/brands/{id}
///
/// Unverified brands are visible only to admins and to themselves.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BrandPublic>>> {
    let is_self = user.kind == AccountKind::Brand && user.account_id == id;
    let brand = BrandRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|b| b.is_active)
        .filter(|b| b.is_verified || is_self || user.kind == AccountKind::Admin)
        .ok_or(AppError::not_found("Brand", id))?;

    let niche_ids = BrandRepo::niche_ids(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: BrandPublic {
            id: brand.id,
            brand_name: brand.brand_name,
            username: brand.username,
            company_website: brand.company_website,
            brand_bio: brand.brand_bio,
            profile_image_url: brand.profile_image_url,
            is_verified: brand.is_verified,
            niche_ids,
            created_at: brand.created_at,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load(state: &AppState, id: DbId) -> AppResult<Brand> {
    BrandRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|b| b.is_active)
        .ok_or(AppError::not_found("Brand", id))
}

async fn me_view(state: &AppState, brand: Brand) -> AppResult<BrandMe> {
    let niche_ids = BrandRepo::niche_ids(&state.pool, brand.id).await?;
    let completion = profile::brand_completion(&brand, niche_ids.len());
    Ok(BrandMe {
        brand: brand.into(),
        niche_ids,
        completion,
    })
}

fn validate_update(input: UpdateBrandRequest) -> AppResult<UpdateBrand> {
    if input
        .brand_name
        .as_deref()
        .is_some_and(|n| n.trim().is_empty())
    {
        return Err(AppError::validation("Brand name cannot be blank"));
    }
    let phone = match non_empty(input.phone.as_deref()) {
        Some(p) => Some(normalize_phone(p)?),
        None => None,
    };
    let poc_email = match non_empty(input.poc_email.as_deref()) {
        Some(e) => Some(normalize_email(e)?),
        None => None,
    };
    let poc_contact_number = match non_empty(input.poc_contact_number.as_deref()) {
        Some(p) => Some(normalize_phone(p)?),
        None => None,
    };
    if let Some(bio) = &input.brand_bio {
        validate_bio(bio)?;
    }
    if let Some(website) = &input.company_website {
        validate_link("company_website", website)?;
    }

    let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
    Ok(UpdateBrand {
        brand_name: trimmed(input.brand_name),
        phone,
        legal_entity_name: trimmed(input.legal_entity_name),
        company_address: trimmed(input.company_address),
        company_website: trimmed(input.company_website),
        brand_bio: trimmed(input.brand_bio),
        poc_name: trimmed(input.poc_name),
        poc_designation: trimmed(input.poc_designation),
        poc_email,
        poc_contact_number,
    })
}
