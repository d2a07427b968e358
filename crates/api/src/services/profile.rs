//! Profile completion tracking and automatic review submission.
//!
//! Every profile mutation calls one of the `sync_*` functions with the
//! updated row. When the checklist passes and the profile is not yet
//! verified, the profile is queued for admin review, unless a review is
//! already pending or was approved.

use influx_core::profile_completion::{
    became_complete, evaluate_brand, evaluate_influencer, BrandProfileFacts,
    InfluencerProfileFacts, ProfileCompletion,
};
use influx_core::review::{PROFILE_BRAND, PROFILE_INFLUENCER, REVIEW_REJECTED};
use influx_core::types::DbId;
use influx_db::models::brand::Brand;
use influx_db::models::influencer::Influencer;
use influx_db::repositories::{BrandRepo, InfluencerRepo, ProfileReviewRepo};

use crate::error::AppResult;
use crate::services::notify::{self, Notice, KIND_PROFILE_SUBMITTED};
use crate::state::AppState;

pub fn influencer_completion(influencer: &Influencer) -> ProfileCompletion {
    evaluate_influencer(&InfluencerProfileFacts {
        name: Some(influencer.name.as_str()),
        bio: influencer.bio.as_deref(),
        profile_image_url: influencer.profile_image_url.as_deref(),
        has_city: influencer.city_id.is_some(),
        is_whatsapp_verified: influencer.is_whatsapp_verified,
        social_links: influencer.social_links(),
        collaboration_costs: influencer.collaboration_costs.as_ref(),
    })
}

pub fn brand_completion(brand: &Brand, niche_count: usize) -> ProfileCompletion {
    evaluate_brand(&BrandProfileFacts {
        brand_name: Some(brand.brand_name.as_str()),
        legal_entity_name: brand.legal_entity_name.as_deref(),
        company_address: brand.company_address.as_deref(),
        brand_bio: brand.brand_bio.as_deref(),
        profile_image_url: brand.profile_image_url.as_deref(),
        poc_name: brand.poc_name.as_deref(),
        poc_email: brand.poc_email.as_deref(),
        poc_contact_number: brand.poc_contact_number.as_deref(),
        niche_count,
        is_email_verified: brand.is_email_verified,
    })
}

/// Re-evaluate an influencer after an edit. `influencer` is the updated row.
pub async fn sync_influencer(
    state: &AppState,
    influencer: &Influencer,
) -> AppResult<ProfileCompletion> {
    let completion = influencer_completion(influencer);
    if completion.is_complete != influencer.is_profile_completed {
        InfluencerRepo::set_profile_completed(&state.pool, influencer.id, completion.is_complete)
            .await?;
    }

    let just_completed = became_complete(influencer.is_profile_completed, &completion);
    if completion.is_complete && !influencer.is_verified {
        let submitted =
            submit_if_due(state, PROFILE_INFLUENCER, influencer.id, just_completed).await?;
        if let Some(review_id) = submitted {
            notify::influencer(state, influencer, submitted_notice(review_id)).await;
        }
    }

    Ok(completion)
}

/// Re-evaluate a brand after an edit. `brand` is the updated row.
pub async fn sync_brand(state: &AppState, brand: &Brand) -> AppResult<ProfileCompletion> {
    let niche_count = BrandRepo::niche_ids(&state.pool, brand.id).await?.len();
    let completion = brand_completion(brand, niche_count);
    if completion.is_complete != brand.is_profile_completed {
        BrandRepo::set_profile_completed(&state.pool, brand.id, completion.is_complete).await?;
    }

    let just_completed = became_complete(brand.is_profile_completed, &completion);
    if completion.is_complete && !brand.is_verified {
        if let Some(review_id) = submit_if_due(state, PROFILE_BRAND, brand.id, just_completed).await? {
            notify::brand(state, brand, submitted_notice(review_id)).await;
        }
    }

    Ok(completion)
}

/// Queue a review when the profile just became complete, or when it was
/// edited after a rejection. Returns the new review id.
async fn submit_if_due(
    state: &AppState,
    profile_type: &str,
    profile_id: DbId,
    just_completed: bool,
) -> AppResult<Option<DbId>> {
    let resubmission = !just_completed
        && ProfileReviewRepo::latest_for_profile(&state.pool, profile_type, profile_id)
            .await?
            .is_some_and(|r| r.status == REVIEW_REJECTED);

    if !just_completed && !resubmission {
        return Ok(None);
    }

    let review = ProfileReviewRepo::submit(&state.pool, profile_type, profile_id).await?;
    if let Some(review) = &review {
        tracing::info!(
            review_id = review.id,
            profile_type,
            profile_id,
            resubmission,
            "Profile submitted for review"
        );
    }
    Ok(review.map(|r| r.id))
}

fn submitted_notice(review_id: DbId) -> Notice {
    Notice::new(
        KIND_PROFILE_SUBMITTED,
        "Profile submitted for review",
        "Your profile is complete and has been sent for verification.",
    )
    .with_data(serde_json::json!({ "review_id": review_id }))
}

