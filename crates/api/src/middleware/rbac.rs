//! Account-kind extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects tokens issued to a
//! different kind of account.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use influx_core::accounts::AccountKind;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_kind(
    parts: &mut Parts,
    state: &AppState,
    kind: AccountKind,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.kind != kind {
        return Err(AppError::forbidden(format!("{kind} account required")));
    }
    Ok(user)
}

/// Requires an influencer token. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn apply(RequireInfluencer(user): RequireInfluencer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireInfluencer(pub AuthUser);

impl FromRequestParts<AppState> for RequireInfluencer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_kind(parts, state, AccountKind::Influencer)
            .await
            .map(RequireInfluencer)
    }
}

/// Requires a brand token. Rejects with 403 Forbidden otherwise.
pub struct RequireBrand(pub AuthUser);

impl FromRequestParts<AppState> for RequireBrand {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_kind(parts, state, AccountKind::Brand)
            .await
            .map(RequireBrand)
    }
}

/// Requires an admin token. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_kind(parts, state, AccountKind::Admin)
            .await
            .map(RequireAdmin)
    }
}
