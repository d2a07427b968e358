//! Access/refresh token issuance.

use chrono::Utc;
use influx_core::accounts::AccountKind;
use influx_core::types::DbId;
use influx_db::models::session::CreateSession;
use influx_db::repositories::SessionRepo;
use serde::Serialize;

use crate::auth::jwt::{generate_access_token, generate_refresh_token};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Tokens handed to a client after login, signup or refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub account_kind: AccountKind,
    pub account_id: DbId,
}

/// Tokens plus the signed-in account's profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse<P: Serialize> {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub profile: P,
}

/// Generate access + refresh tokens and persist a session row.
pub async fn issue_tokens(
    state: &AppState,
    kind: AccountKind,
    account_id: DbId,
    user_agent: Option<String>,
) -> AppResult<TokenPair> {
    let access_token = generate_access_token(account_id, kind, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            account_kind: kind.as_str().to_string(),
            account_id,
            refresh_token_hash: refresh_hash,
            expires_at,
            user_agent,
        },
    )
    .await?;

    Ok(TokenPair {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        account_kind: kind,
        account_id,
    })
}
