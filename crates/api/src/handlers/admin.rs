//! Admin-only handlers: the profile review queue, payout settlement for
//! referral redemptions, and Pro membership grants.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use influx_core::pro::grant_period;
use influx_core::profile_completion::ProfileCompletion;
use influx_core::referral::{PayoutOutcome, TXN_FAILED, TXN_PAID, TXN_PROCESSING};
use influx_core::review::{
    ensure_pending, validate_profile_type, validate_rejection_reason, validate_review_status,
    PROFILE_BRAND, PROFILE_INFLUENCER,
};
use influx_core::types::DbId;
use influx_db::models::brand::BrandResponse;
use influx_db::models::credit_transaction::CreditTransaction;
use influx_db::models::influencer::Influencer;
use influx_db::models::pro_subscription::ProSubscription;
use influx_db::models::profile_review::{ProfileReview, ReviewListParams};
use influx_db::repositories::{
    BrandRepo, CreditTransactionRepo, InfluencerRepo, ProSubscriptionRepo, ProfileReviewRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::StatusPageParams;
use crate::response::DataResponse;
use crate::services::notify::{
    self, Notice, KIND_PRO_GRANTED, KIND_PROFILE_APPROVED, KIND_PROFILE_REJECTED,
    KIND_REDEMPTION_UPDATED, KIND_REFERRAL_REWARD,
};
use crate::services::profile;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// The profile under review, in the shape its owner sees it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReviewedProfile {
    Influencer(Influencer),
    Brand(BrandResponse),
}

#[derive(Debug, Serialize)]
pub struct ReviewDetail {
    pub review: ProfileReview,
    pub profile: ReviewedProfile,
    pub completion: ProfileCompletion,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResult {
    pub review: ProfileReview,
    /// Reward credited to the referrer, when the approval triggered one.
    pub referral_reward: Option<CreditTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct GrantProRequest {
    pub months: u32,
}

// ---------------------------------------------------------------------------
// Profile reviews
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/profile-reviews?status=&profile_type=&limit=&offset=
pub async fn list_reviews(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<DataResponse<Vec<ProfileReview>>>> {
    if let Some(status) = &params.status {
        validate_review_status(status)?;
    }
    if let Some(profile_type) = &params.profile_type {
        validate_profile_type(profile_type)?;
    }
    let reviews = ProfileReviewRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/admin/profile-reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReviewDetail>>> {
    let review = find_review(&state, id).await?;

    let (profile, completion) = match review.profile_type.as_str() {
        PROFILE_INFLUENCER => {
            let influencer = InfluencerRepo::find_by_id(&state.pool, review.profile_id)
                .await?
                .ok_or(AppError::not_found("Influencer", review.profile_id))?;
            let completion = profile::influencer_completion(&influencer);
            (ReviewedProfile::Influencer(influencer), completion)
        }
        PROFILE_BRAND => {
            let brand = BrandRepo::find_by_id(&state.pool, review.profile_id)
                .await?
                .ok_or(AppError::not_found("Brand", review.profile_id))?;
            let niche_count = BrandRepo::niche_ids(&state.pool, brand.id).await?.len();
            let completion = profile::brand_completion(&brand, niche_count);
            (ReviewedProfile::Brand(brand.into()), completion)
        }
        other => {
            return Err(AppError::InternalError(format!(
                "Review {id} has unknown profile type '{other}'"
            )))
        }
    };

    Ok(Json(DataResponse {
        data: ReviewDetail {
            review,
            profile,
            completion,
        },
    }))
}

/// POST /api/v1/admin/profile-reviews/{id}/approve
///
/// Verifies the profile. Approving a referred influencer credits the
/// referrer once.
pub async fn approve_review(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ApprovalResult>>> {
    let current = find_review(&state, id).await?;
    ensure_pending(&current.status)?;

    let approval = ProfileReviewRepo::approve(&state.pool, id, admin.account_id)
        .await?
        .ok_or_else(|| AppError::conflict("Review was already decided"))?;
    let review = approval.review;

    tracing::info!(
        review_id = id,
        admin_id = admin.account_id,
        profile_type = %review.profile_type,
        profile_id = review.profile_id,
        "Profile approved"
    );

    let notice = Notice::new(
        KIND_PROFILE_APPROVED,
        "Profile verified",
        "Your profile has been verified. You're all set.",
    )
    .with_data(serde_json::json!({ "review_id": id }));
    notify_profile_owner(&state, &review, notice).await;

    if let Some(reward) = &approval.referral_reward {
        tracing::info!(
            referrer_id = reward.influencer_id,
            referred_id = review.profile_id,
            amount = reward.amount,
            "Referral reward credited"
        );
        notify::influencer_by_id(
            &state,
            reward.influencer_id,
            Notice::new(
                KIND_REFERRAL_REWARD,
                "Referral reward",
                format!("You earned {} from a referral", reward.amount),
            )
            .with_data(serde_json::json!({ "transaction_id": reward.id })),
        )
        .await;
    }

    Ok(Json(DataResponse {
        data: ApprovalResult {
            review,
            referral_reward: approval.referral_reward,
        },
    }))
}

/// POST /api/v1/admin/profile-reviews/{id}/reject
///
/// The owner's next profile edit resubmits the profile.
pub async fn reject_review(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<ProfileReview>>> {
    let reason = input.reason.trim();
    validate_rejection_reason(reason)?;
    let current = find_review(&state, id).await?;
    ensure_pending(&current.status)?;

    let review = ProfileReviewRepo::reject(&state.pool, id, admin.account_id, reason)
        .await?
        .ok_or_else(|| AppError::conflict("Review was already decided"))?;

    tracing::info!(review_id = id, admin_id = admin.account_id, "Profile rejected");

    let notice = Notice::new(
        KIND_PROFILE_REJECTED,
        "Profile needs changes",
        format!("Your profile was not approved: {reason}"),
    )
    .with_data(serde_json::json!({ "review_id": id, "reason": reason }));
    notify_profile_owner(&state, &review, notice).await;

    Ok(Json(DataResponse { data: review }))
}

// ---------------------------------------------------------------------------
// Redemptions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/redemptions?status=&limit=&offset=
pub async fn list_redemptions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<StatusPageParams>,
) -> AppResult<Json<DataResponse<Vec<CreditTransaction>>>> {
    if let Some(status) = &params.status {
        if ![TXN_PROCESSING, TXN_PAID, TXN_FAILED].contains(&status.as_str()) {
            return Err(AppError::validation(format!(
                "Invalid redemption status '{status}'"
            )));
        }
    }
    let items = CreditTransactionRepo::list_redemptions(
        &state.pool,
        params.status.as_deref(),
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/admin/redemptions/{id}/paid
pub async fn mark_paid(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreditTransaction>>> {
    settle(&state, admin.account_id, id, PayoutOutcome::Paid).await
}

/// POST /api/v1/admin/redemptions/{id}/failed
///
/// The consolidated rewards return to the influencer's pending balance.
pub async fn mark_failed(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreditTransaction>>> {
    settle(&state, admin.account_id, id, PayoutOutcome::Failed).await
}

async fn settle(
    state: &AppState,
    admin_id: DbId,
    id: DbId,
    outcome: PayoutOutcome,
) -> AppResult<Json<DataResponse<CreditTransaction>>> {
    CreditTransactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Redemption", id))?;

    let redemption = CreditTransactionRepo::settle(&state.pool, id, outcome)
        .await?
        .ok_or_else(|| AppError::conflict("Only processing redemptions can be settled"))?;

    tracing::info!(
        redemption_id = id,
        admin_id,
        outcome = outcome.as_str(),
        amount = redemption.amount,
        "Redemption settled"
    );

    let body = match outcome {
        PayoutOutcome::Paid => format!("Your payout of {} has been sent", redemption.amount),
        PayoutOutcome::Failed => format!(
            "Your payout of {} failed. The amount is back in your balance",
            redemption.amount
        ),
    };
    notify::influencer_by_id(
        state,
        redemption.influencer_id,
        Notice::new(KIND_REDEMPTION_UPDATED, "Payout update", body).with_data(
            serde_json::json!({ "redemption_id": id, "status": outcome.as_str() }),
        ),
    )
    .await;

    Ok(Json(DataResponse { data: redemption }))
}

// ---------------------------------------------------------------------------
// Pro membership
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/influencers/{id}/pro
///
/// Grant `months` of Pro. A grant during an active membership extends it.
pub async fn grant_pro(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<GrantProRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProSubscription>>)> {
    let influencer = InfluencerRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|i| i.is_active)
        .ok_or(AppError::not_found("Influencer", id))?;

    let current_end = ProSubscriptionRepo::latest_active_end(&state.pool, id).await?;
    let (starts_at, ends_at) =
        grant_period(input.months, current_end, Utc::now()).map_err(AppError::validation)?;
    let subscription =
        ProSubscriptionRepo::create(&state.pool, id, starts_at, ends_at, Some(admin.account_id))
            .await?;

    tracing::info!(
        influencer_id = id,
        admin_id = admin.account_id,
        months = input.months,
        %ends_at,
        "Pro granted"
    );

    notify::influencer(
        &state,
        &influencer,
        Notice::new(
            KIND_PRO_GRANTED,
            "Welcome to Pro",
            format!(
                "Pro is active until {}. You get 24 hour early access to new campaigns.",
                ends_at.format("%d %b %Y")
            ),
        )
        .with_data(serde_json::json!({ "subscription_id": subscription.id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: subscription })))
}

/// DELETE /api/v1/admin/influencers/{id}/pro
pub async fn cancel_pro(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let cancelled = ProSubscriptionRepo::cancel_active(&state.pool, id).await?;
    if cancelled == 0 {
        return Err(AppError::not_found("Pro subscription for influencer", id));
    }
    tracing::info!(influencer_id = id, admin_id = admin.account_id, cancelled, "Pro cancelled");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_review(state: &AppState, id: DbId) -> AppResult<ProfileReview> {
    ProfileReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Profile review", id))
}

async fn notify_profile_owner(state: &AppState, review: &ProfileReview, notice: Notice) {
    match review.profile_type.as_str() {
        PROFILE_INFLUENCER => notify::influencer_by_id(state, review.profile_id, notice).await,
        PROFILE_BRAND => notify::brand_by_id(state, review.profile_id, notice).await,
        _ => {}
    }
}
