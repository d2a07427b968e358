//! Handlers for weekly credits, referral earnings, UPI payout ids and the
//! caller's Pro membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use influx_core::credits::CreditBalance;
use influx_core::referral::{MIN_REDEMPTION_AMOUNT, REFERRAL_REWARD_AMOUNT};
use influx_core::types::DbId;
use influx_core::validation::validate_upi_id;
use influx_db::models::credit_transaction::{CreditTransaction, ReferralTotals};
use influx_db::models::pro_subscription::ProSubscription;
use influx_db::models::upi::InfluencerUpi;
use influx_db::repositories::credit_transaction_repo::RedeemOutcome;
use influx_db::repositories::{CreditTransactionRepo, ProSubscriptionRepo, UpiRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::influencer;
use crate::middleware::rbac::RequireInfluencer;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::services::credits;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReferralSummary {
    pub referral_code: String,
    pub reward_per_referral: i64,
    pub min_redemption: i64,
    pub totals: ReferralTotals,
    pub ledger: Vec<CreditTransaction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedeemRequest {
    /// Defaults to the primary UPI id when omitted.
    pub upi_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUpiRequest {
    pub upi_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProStatus {
    pub is_pro: bool,
    pub subscription: Option<ProSubscription>,
}

// ---------------------------------------------------------------------------
// Credits and referrals
// ---------------------------------------------------------------------------

/// GET /api/v1/credits/me
pub async fn credits_me(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<CreditBalance>>> {
    let me = influencer::load(&state, user.account_id).await?;
    let balance = credits::current_balance(&state.pool, &me, Utc::now()).await?;
    Ok(Json(DataResponse { data: balance }))
}

/// GET /api/v1/referrals/me?limit=&offset=
pub async fn referrals_me(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<ReferralSummary>>> {
    let me = influencer::load(&state, user.account_id).await?;
    let totals = CreditTransactionRepo::totals(&state.pool, me.id).await?;
    let ledger = CreditTransactionRepo::list_for_influencer(
        &state.pool,
        me.id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse {
        data: ReferralSummary {
            referral_code: me.referral_code,
            reward_per_referral: REFERRAL_REWARD_AMOUNT,
            min_redemption: MIN_REDEMPTION_AMOUNT,
            totals,
            ledger,
        },
    }))
}

/// POST /api/v1/referrals/redeem
///
/// Moves every pending reward into one payout request.
pub async fn redeem(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<RedeemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreditTransaction>>)> {
    let upi_id = match input.upi_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(upi) => {
            validate_upi_id(upi)?;
            upi.to_string()
        }
        None => {
            UpiRepo::find_primary(&state.pool, user.account_id)
                .await?
                .ok_or_else(|| AppError::validation("Add a UPI id before redeeming"))?
                .upi_id
        }
    };

    match CreditTransactionRepo::redeem(&state.pool, user.account_id, &upi_id).await? {
        RedeemOutcome::Redeemed(redemption) => {
            tracing::info!(
                influencer_id = user.account_id,
                redemption_id = redemption.id,
                amount = redemption.amount,
                "Redemption requested"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: redemption })))
        }
        RedeemOutcome::BelowMinimum { available } => Err(AppError::validation(format!(
            "Minimum redemption is {MIN_REDEMPTION_AMOUNT}; you have {available} available"
        ))),
    }
}

// ---------------------------------------------------------------------------
// UPI ids
// ---------------------------------------------------------------------------

/// GET /api/v1/upi
pub async fn list_upi(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<Vec<InfluencerUpi>>>> {
    let items = UpiRepo::list_for_influencer(&state.pool, user.account_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/upi
pub async fn create_upi(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Json(input): Json<CreateUpiRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<InfluencerUpi>>)> {
    let upi_id = input.upi_id.trim();
    validate_upi_id(upi_id)?;
    let upi = UpiRepo::create(&state.pool, user.account_id, upi_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: upi })))
}

/// PUT /api/v1/upi/{id}/primary
pub async fn set_primary_upi(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UpiRepo::set_primary(&state.pool, id, user.account_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("UPI id", id))
    }
}

/// DELETE /api/v1/upi/{id}
pub async fn delete_upi(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if UpiRepo::soft_delete(&state.pool, id, user.account_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("UPI id", id))
    }
}

// ---------------------------------------------------------------------------
// Pro
// ---------------------------------------------------------------------------

/// GET /api/v1/pro/me
pub async fn pro_me(
    State(state): State<AppState>,
    RequireInfluencer(user): RequireInfluencer,
) -> AppResult<Json<DataResponse<ProStatus>>> {
    let subscription =
        ProSubscriptionRepo::find_current(&state.pool, user.account_id, Utc::now()).await?;
    Ok(Json(DataResponse {
        data: ProStatus {
            is_pro: subscription.is_some(),
            subscription,
        },
    }))
}
