//! Multipart image uploads for profile pictures, banners and brand logos.
//!
//! The image format is sniffed from the bytes; the client's filename and
//! declared content type are ignored. Replaced objects are deleted
//! best-effort after the row points at the new URL, and objects stored by a
//! request that then fails are deleted the same way.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use influx_cloud::{key_from_url, object_key};
use influx_core::types::DbId;
use influx_core::upload::{validate_image, AcceptedImage};
use influx_db::models::brand::BrandResponse;
use influx_db::models::influencer::Influencer;
use influx_db::repositories::{BrandRepo, InfluencerRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{brand, influencer};
use crate::middleware::rbac::{RequireBrand, RequireInfluencer};
use crate::response::DataResponse;
use crate::services::profile;
use crate::state::AppState;

const FIELD_PROFILE_IMAGE: &str = "profile_image";
const FIELD_BANNER_IMAGE: &str = "banner_image";
const FIELD_LOGO: &str = "logo";

const PREFIX_INFLUENCER_PROFILE: &str = "influencers/profile";
const PREFIX_INFLUENCER_BANNER: &str = "influencers/banner";
const PREFIX_BRAND_LOGO: &str = "brands/logo";

/// POST /api/v1/influencers/me/images
///
/// Accepts `profile_image` and/or `banner_image` parts, each at most once.
/// Every part is validated before anything is stored.
pub async fn influencer_images(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Influencer>>> {
    let mut profile_image: Option<PendingImage> = None;
    let mut banner_image: Option<PendingImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            FIELD_PROFILE_IMAGE => &mut profile_image,
            FIELD_BANNER_IMAGE => &mut banner_image,
            _ => continue,
        };
        if slot.is_some() {
            return Err(AppError::validation(format!("Send '{name}' only once")));
        }
        *slot = Some(PendingImage::read(field).await?);
    }

    if profile_image.is_none() && banner_image.is_none() {
        return Err(AppError::validation(
            "Upload a 'profile_image' or 'banner_image' file",
        ));
    }

    let previous = influencer::load(&state, user.account_id).await?;

    let profile_url = match profile_image {
        Some(image) => {
            Some(store_image(&state, PREFIX_INFLUENCER_PROFILE, user.account_id, image).await?)
        }
        None => None,
    };
    let banner_url = match banner_image {
        Some(image) => {
            match store_image(&state, PREFIX_INFLUENCER_BANNER, user.account_id, image).await {
                Ok(url) => Some(url),
                Err(e) => {
                    discard(&state, profile_url.as_deref()).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let updated = match InfluencerRepo::set_images(
        &state.pool,
        user.account_id,
        profile_url.as_deref(),
        banner_url.as_deref(),
    )
    .await
    {
        Ok(Some(row)) => row,
        outcome => {
            discard(&state, profile_url.as_deref()).await;
            discard(&state, banner_url.as_deref()).await;
            return Err(match outcome {
                Err(e) => e.into(),
                _ => AppError::not_found("Influencer", user.account_id),
            });
        }
    };

    if profile_url.is_some() {
        discard(&state, previous.profile_image_url.as_deref()).await;
    }
    if banner_url.is_some() {
        discard(&state, previous.banner_image_url.as_deref()).await;
    }
    tracing::info!(influencer_id = updated.id, "Influencer images updated");

    profile::sync_influencer(&state, &updated).await?;
    let updated = influencer::load(&state, user.account_id).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/brands/me/logo
///
/// Accepts a single `logo` part.
pub async fn brand_logo(
    State(state): State<AppState>,
    RequireBrand(user): RequireBrand,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<BrandResponse>>> {
    let mut logo: Option<PendingImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FIELD_LOGO) {
            continue;
        }
        if logo.is_some() {
            return Err(AppError::validation("Send 'logo' only once"));
        }
        logo = Some(PendingImage::read(field).await?);
    }

    let logo = logo.ok_or_else(|| AppError::validation("Upload a 'logo' file"))?;

    let previous = brand::load(&state, user.account_id).await?;
    let url = store_image(&state, PREFIX_BRAND_LOGO, user.account_id, logo).await?;
    let updated = match BrandRepo::set_logo(&state.pool, user.account_id, &url).await {
        Ok(Some(row)) => row,
        outcome => {
            discard(&state, Some(url.as_str())).await;
            return Err(match outcome {
                Err(e) => e.into(),
                _ => AppError::not_found("Brand", user.account_id),
            });
        }
    };
    discard(&state, previous.profile_image_url.as_deref()).await;
    tracing::info!(brand_id = updated.id, "Brand logo updated");

    profile::sync_brand(&state, &updated).await?;
    let updated = brand::load(&state, user.account_id).await?;
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// A validated upload part waiting to be stored.
struct PendingImage {
    bytes: Vec<u8>,
    accepted: AcceptedImage,
}

impl PendingImage {
    async fn read(field: Field<'_>) -> AppResult<Self> {
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
            .to_vec();
        let accepted = validate_image(&bytes).map_err(AppError::validation)?;
        Ok(Self { bytes, accepted })
    }
}

async fn store_image(
    state: &AppState,
    prefix: &str,
    owner_id: DbId,
    image: PendingImage,
) -> AppResult<String> {
    let key = object_key(prefix, owner_id, image.accepted.extension);
    let url = state
        .storage
        .put(&key, image.bytes, image.accepted.content_type)
        .await?;
    tracing::debug!(key = %key, content_type = image.accepted.content_type, "Image stored");
    Ok(url)
}

/// Delete an object we previously stored. URLs from elsewhere are left alone.
async fn discard(state: &AppState, url: Option<&str>) {
    let Some(url) = url else { return };
    let base = state.storage.url_for("");
    let Some(key) = key_from_url(&base, url) else {
        return;
    };
    if let Err(e) = state.storage.delete(key).await {
        tracing::warn!(error = %e, key, "Failed to delete replaced image");
    }
}
