//! Issue and verify one-time codes.
//!
//! Delivery is the caller's job; a delivery failure fails the request.

use chrono::{Duration, Utc};
use influx_core::otp::{self, OtpPurpose, OtpRejection, StoredOtp, OTP_EXPIRY_MINS};
use influx_db::repositories::OtpRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Store a fresh code for `destination` and return the plaintext.
///
/// A live code issued less than the cooldown ago blocks a resend.
pub async fn issue(state: &AppState, destination: &str, purpose: OtpPurpose) -> AppResult<String> {
    let now = Utc::now();

    if let Some(existing) = OtpRepo::find(&state.pool, destination, purpose.as_str()).await? {
        if existing.consumed_at.is_none() {
            let wait = otp::cooldown_remaining_secs(Some(existing.sent_at), now);
            if wait > 0 {
                return Err(AppError::TooManyRequests(format!(
                    "Please wait {wait} seconds before requesting another code"
                )));
            }
        }
    }

    let code = state
        .config
        .otp
        .static_code
        .clone()
        .unwrap_or_else(otp::generate_code);
    let hash = otp::hash_code(&state.config.otp.secret, destination, purpose, &code);
    let expires_at = now + Duration::minutes(OTP_EXPIRY_MINS);

    OtpRepo::upsert(&state.pool, destination, purpose.as_str(), &hash, expires_at).await?;
    tracing::info!(purpose = purpose.as_str(), "OTP issued");

    Ok(code)
}

/// Check `code` and consume it. A wrong code burns one attempt.
pub async fn verify(
    state: &AppState,
    destination: &str,
    purpose: OtpPurpose,
    code: &str,
) -> AppResult<()> {
    let stored = OtpRepo::find(&state.pool, destination, purpose.as_str())
        .await?
        .filter(|o| o.consumed_at.is_none())
        .ok_or_else(|| AppError::validation("No active code. Request a new one"))?;

    let submitted = otp::hash_code(&state.config.otp.secret, destination, purpose, code);
    let check = otp::check(
        &StoredOtp {
            code_hash: &stored.code_hash,
            expires_at: stored.expires_at,
            attempts: stored.attempts,
        },
        &submitted,
        Utc::now(),
    );

    match check {
        Ok(()) => {
            // Two concurrent verifications of the same code: only one wins.
            if !OtpRepo::consume(&state.pool, stored.id).await? {
                return Err(AppError::validation("Code has already been used"));
            }
            Ok(())
        }
        Err(OtpRejection::Mismatch) => {
            OtpRepo::increment_attempts(&state.pool, stored.id).await?;
            tracing::info!(purpose = purpose.as_str(), "OTP mismatch");
            Err(AppError::validation(OtpRejection::Mismatch.message()))
        }
        Err(rejection) => Err(AppError::validation(rejection.message())),
    }
}
