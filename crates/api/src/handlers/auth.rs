//! Handlers for the `/auth` resource.
//!
//! Influencers sign in with a WhatsApp OTP sent to their phone. Brands use
//! email + password with an emailed verification code. Admins use email +
//! password. Every successful sign-in creates a refresh-token session.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use influx_core::accounts::AccountKind;
use influx_core::campaign::{validate_gender, MIN_TARGET_AGE};
use influx_core::credits::{next_weekly_reset, WEEKLY_CREDITS};
use influx_core::eligibility::age_on;
use influx_core::otp::{OtpPurpose, OTP_EXPIRY_MINS};
use influx_core::referral::{generate_referral_code, normalize_code};
use influx_core::types::{Date, DbId};
use influx_core::validation::{normalize_email, normalize_phone, normalize_username};
use influx_db::models::admin::AdminResponse;
use influx_db::models::brand::{BrandResponse, CreateBrand};
use influx_db::models::influencer::{CreateInfluencer, Influencer};
use influx_db::repositories::{AdminRepo, BrandRepo, InfluencerRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::hash_refresh_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::lookup::checked_niche_ids;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::sessions::{issue_tokens, AuthResponse, TokenPair};
use crate::services::{otp, profile};
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking a brand account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

/// Referral codes are random; a handful of retries always finds a free one.
const REFERRAL_CODE_ATTEMPTS: usize = 5;

const EMAIL_VERIFY_SUBJECT: &str = "Verify your Influx brand account";
const PASSWORD_RESET_SUBJECT: &str = "Reset your Influx password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PhoneOtpRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct OtpSent {
    /// Whether the phone already belongs to an influencer (login vs signup).
    pub is_registered: bool,
    pub expires_in_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct InfluencerSignupRequest {
    pub phone: String,
    pub otp: String,
    pub name: String,
    pub username: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    #[serde(default)]
    pub niche_ids: Vec<DbId>,
    pub referral_code: Option<String>,
    pub device_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InfluencerLoginRequest {
    pub phone: String,
    pub otp: String,
    pub device_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandSignupRequest {
    pub brand_name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct BrandSignupResponse {
    pub brand: BrandResponse,
    pub verification_sent_to: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordLoginRequest {
    pub email: String,
    pub password: String,
    pub device_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Influencer
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/influencer/otp
///
/// Send a login/signup code to the phone over WhatsApp.
pub async fn influencer_request_otp(
    State(state): State<AppState>,
    Json(input): Json<PhoneOtpRequest>,
) -> AppResult<Json<DataResponse<OtpSent>>> {
    let phone = normalize_phone(&input.phone)?;
    let is_registered = InfluencerRepo::find_by_phone(&state.pool, &phone)
        .await?
        .is_some();

    let code = otp::issue(&state, &phone, OtpPurpose::InfluencerAuth).await?;
    state.notifier.send_otp_whatsapp(&phone, &code).await?;

    Ok(Json(DataResponse {
        data: OtpSent {
            is_registered,
            expires_in_secs: OTP_EXPIRY_MINS * 60,
        },
    }))
}

/// POST /api/v1/auth/influencer/signup
pub async fn influencer_signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<InfluencerSignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse<Influencer>>)> {
    let phone = normalize_phone(&input.phone)?;
    let username = normalize_username(&input.username)?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if let Some(gender) = &input.gender {
        validate_gender(gender).map_err(AppError::validation)?;
    }
    let now = Utc::now();
    if let Some(dob) = input.date_of_birth {
        if age_on(dob, now.date_naive()) < MIN_TARGET_AGE {
            return Err(AppError::validation(format!(
                "You must be at least {MIN_TARGET_AGE} years old"
            )));
        }
    }

    if InfluencerRepo::find_by_phone(&state.pool, &phone).await?.is_some() {
        return Err(AppError::conflict("Phone number is already registered. Log in instead"));
    }
    if username_taken(&state, &username).await? {
        return Err(AppError::conflict("Username is already taken"));
    }
    let niche_ids = checked_niche_ids(&state, &input.niche_ids, true).await?;

    let referred_by_id = match input.referral_code.as_deref().map(normalize_code) {
        Some(code) if !code.is_empty() => Some(
            InfluencerRepo::find_by_referral_code(&state.pool, &code)
                .await?
                .ok_or_else(|| AppError::validation("Referral code is not valid"))?
                .id,
        ),
        _ => None,
    };

    otp::verify(&state, &phone, OtpPurpose::InfluencerAuth, &input.otp).await?;

    let referral_code = unique_referral_code(&state, &name).await?;
    let create = CreateInfluencer {
        name,
        username,
        phone,
        gender: input.gender,
        date_of_birth: input.date_of_birth,
        referral_code,
        referred_by_id,
        weekly_credits: WEEKLY_CREDITS,
        weekly_credits_reset_at: next_weekly_reset(now),
    };
    let influencer = InfluencerRepo::create(&state.pool, &create, &niche_ids).await?;
    if let Some(token) = non_empty(input.device_token.as_deref()) {
        InfluencerRepo::set_device_token(&state.pool, influencer.id, Some(token)).await?;
    }

    tracing::info!(
        influencer_id = influencer.id,
        referred_by_id = ?influencer.referred_by_id,
        "Influencer signed up"
    );

    let tokens = issue_tokens(
        &state,
        AccountKind::Influencer,
        influencer.id,
        user_agent(&headers),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            tokens,
            profile: influencer,
        }),
    ))
}

/// POST /api/v1/auth/influencer/login
pub async fn influencer_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<InfluencerLoginRequest>,
) -> AppResult<Json<AuthResponse<Influencer>>> {
    let phone = normalize_phone(&input.phone)?;
    let influencer = InfluencerRepo::find_by_phone(&state.pool, &phone)
        .await?
        .ok_or_else(|| AppError::unauthorized("No account for this phone number. Sign up first"))?;

    if !influencer.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    otp::verify(&state, &phone, OtpPurpose::InfluencerAuth, &input.otp).await?;

    InfluencerRepo::record_login(&state.pool, influencer.id).await?;
    if let Some(token) = non_empty(input.device_token.as_deref()) {
        InfluencerRepo::set_device_token(&state.pool, influencer.id, Some(token)).await?;
    }

    let tokens = issue_tokens(
        &state,
        AccountKind::Influencer,
        influencer.id,
        user_agent(&headers),
    )
    .await?;

    Ok(Json(AuthResponse {
        tokens,
        profile: influencer,
    }))
}

// ---------------------------------------------------------------------------
// Brand
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/brand/signup
///
/// Create the brand and email a verification code. Tokens are issued once
/// the email is verified.
pub async fn brand_signup(
    State(state): State<AppState>,
    Json(input): Json<BrandSignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BrandSignupResponse>>)> {
    let brand_name = input.brand_name.trim().to_string();
    if brand_name.is_empty() {
        return Err(AppError::validation("Brand name is required"));
    }
    let username = normalize_username(&input.username)?;
    let email = normalize_email(&input.email)?;
    let phone = match non_empty(input.phone.as_deref()) {
        Some(p) => Some(normalize_phone(p)?),
        None => None,
    };
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    if username_taken(&state, &username).await? {
        return Err(AppError::conflict("Username is already taken"));
    }
    if BrandRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict("Email is already registered"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let brand = BrandRepo::create(
        &state.pool,
        &CreateBrand {
            brand_name,
            username,
            email: email.clone(),
            phone,
            password_hash,
        },
    )
    .await?;
    tracing::info!(brand_id = brand.id, "Brand signed up");

    let code = otp::issue(&state, &email, OtpPurpose::BrandEmailVerify).await?;
    state
        .notifier
        .send_otp_email(&email, EMAIL_VERIFY_SUBJECT, &code)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BrandSignupResponse {
                brand: brand.into(),
                verification_sent_to: email,
            },
        }),
    ))
}

/// POST /api/v1/auth/brand/resend-verification
///
/// Always 202 so the endpoint cannot be used to probe for accounts.
pub async fn brand_resend_verification(
    State(state): State<AppState>,
    Json(input): Json<EmailRequest>,
) -> AppResult<StatusCode> {
    let email = normalize_email(&input.email)?;
    if let Some(brand) = BrandRepo::find_by_email(&state.pool, &email).await? {
        if brand.is_active && !brand.is_email_verified {
            let code = otp::issue(&state, &email, OtpPurpose::BrandEmailVerify).await?;
            state
                .notifier
                .send_otp_email(&email, EMAIL_VERIFY_SUBJECT, &code)
                .await?;
        }
    }
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/brand/verify-email
pub async fn brand_verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<AuthResponse<BrandResponse>>> {
    let email = normalize_email(&input.email)?;
    let brand = BrandRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|b| b.is_active)
        .ok_or_else(|| AppError::validation("No active code. Request a new one"))?;

    otp::verify(&state, &email, OtpPurpose::BrandEmailVerify, &input.otp).await?;
    BrandRepo::set_email_verified(&state.pool, brand.id).await?;

    let brand = BrandRepo::find_by_id(&state.pool, brand.id)
        .await?
        .ok_or(AppError::not_found("Brand", brand.id))?;
    profile::sync_brand(&state, &brand).await?;
    tracing::info!(brand_id = brand.id, "Brand email verified");

    let tokens = issue_tokens(&state, AccountKind::Brand, brand.id, user_agent(&headers)).await?;
    Ok(Json(AuthResponse {
        tokens,
        profile: brand.into(),
    }))
}

/// POST /api/v1/auth/brand/login
pub async fn brand_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PasswordLoginRequest>,
) -> AppResult<Json<AuthResponse<BrandResponse>>> {
    let email = normalize_email(&input.email)
        .map_err(|_| AppError::unauthorized("Invalid email or password"))?;

    // 1. Find brand by email.
    let brand = BrandRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    // 2. Check if the account is active.
    if !brand.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    // 3. Check if the account is temporarily locked.
    if let Some(locked_until) = brand.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::forbidden(
                "Account is temporarily locked. Try again later.",
            ));
        }
    }

    // 4. Verify password.
    let password_valid = verify_password(&input.password, &brand.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // 5. On failure: increment counter, lock if threshold reached.
        let new_count = BrandRepo::increment_failed_login(&state.pool, brand.id).await?;
        if new_count >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            BrandRepo::lock_account(&state.pool, brand.id, lock_until).await?;
            tracing::warn!(brand_id = brand.id, "Brand account locked after failed logins");
        }

        return Err(AppError::unauthorized("Invalid email or password"));
    }

    if !brand.is_email_verified {
        return Err(AppError::forbidden("Verify your email before logging in"));
    }

    // 6. On success: reset failed count, set last_login_at.
    BrandRepo::record_successful_login(&state.pool, brand.id).await?;
    if let Some(token) = non_empty(input.device_token.as_deref()) {
        BrandRepo::set_device_token(&state.pool, brand.id, Some(token)).await?;
    }

    let tokens = issue_tokens(&state, AccountKind::Brand, brand.id, user_agent(&headers)).await?;
    Ok(Json(AuthResponse {
        tokens,
        profile: brand.into(),
    }))
}

/// POST /api/v1/auth/brand/forgot-password
///
/// Always 202 so the endpoint cannot be used to probe for accounts. Delivery
/// problems are logged rather than returned for the same reason.
pub async fn brand_forgot_password(
    State(state): State<AppState>,
    Json(input): Json<EmailRequest>,
) -> AppResult<StatusCode> {
    let Ok(email) = normalize_email(&input.email) else {
        return Ok(StatusCode::ACCEPTED);
    };

    let Some(brand) = BrandRepo::find_by_email(&state.pool, &email).await? else {
        return Ok(StatusCode::ACCEPTED);
    };
    if !brand.is_active {
        return Ok(StatusCode::ACCEPTED);
    }

    match otp::issue(&state, &email, OtpPurpose::BrandPasswordReset).await {
        Ok(code) => {
            if let Err(e) = state
                .notifier
                .send_otp_email(&email, PASSWORD_RESET_SUBJECT, &code)
                .await
            {
                tracing::error!(error = %e, brand_id = brand.id, "Password reset email failed");
            }
        }
        Err(AppError::TooManyRequests(_)) => {
            tracing::debug!(brand_id = brand.id, "Password reset requested during cooldown");
        }
        Err(e) => return Err(e),
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/brand/reset-password
///
/// Set a new password and revoke every session.
pub async fn brand_reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let email = normalize_email(&input.email)?;
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    let brand = BrandRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|b| b.is_active)
        .ok_or_else(|| AppError::validation("No active code. Request a new one"))?;

    otp::verify(&state, &email, OtpPurpose::BrandPasswordReset, &input.otp).await?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    BrandRepo::update_password(&state.pool, brand.id, &password_hash).await?;
    let revoked =
        SessionRepo::revoke_all_for_account(&state.pool, AccountKind::Brand.as_str(), brand.id)
            .await?;

    tracing::info!(brand_id = brand.id, revoked, "Brand password reset");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PasswordLoginRequest>,
) -> AppResult<Json<AuthResponse<AdminResponse>>> {
    let email = normalize_email(&input.email)
        .map_err(|_| AppError::unauthorized("Invalid email or password"))?;

    let admin = AdminRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !admin.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(admin_id = admin.id, "Admin login failed");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    AdminRepo::record_login(&state.pool, admin.id).await?;

    let tokens = issue_tokens(&state, AccountKind::Admin, admin.id, user_agent(&headers)).await?;
    Ok(Json(AuthResponse {
        tokens,
        profile: AdminResponse::from(&admin),
    }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    // 1. Hash the provided refresh token.
    let token_hash = hash_refresh_token(&input.refresh_token);

    // 2. Find matching active session.
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token"))?;

    // 3. Revoke old session (token rotation). Losing the race means another
    //    request already rotated this token.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(AppError::unauthorized("Invalid or expired refresh token"));
    }

    // 4. The account must still exist and be active.
    let kind = AccountKind::from_str_value(&session.account_kind).map_err(AppError::InternalError)?;
    let is_active = match kind {
        AccountKind::Influencer => InfluencerRepo::find_by_id(&state.pool, session.account_id)
            .await?
            .map(|a| a.is_active),
        AccountKind::Brand => BrandRepo::find_by_id(&state.pool, session.account_id)
            .await?
            .map(|a| a.is_active),
        AccountKind::Admin => AdminRepo::find_by_id(&state.pool, session.account_id)
            .await?
            .map(|a| a.is_active),
    };
    match is_active {
        None => return Err(AppError::unauthorized("Account no longer exists")),
        Some(false) => return Err(AppError::forbidden("Account is deactivated")),
        Some(true) => {}
    }

    // 5. Generate new tokens and create new session.
    let tokens = issue_tokens(&state, kind, session.account_id, user_agent(&headers)).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_account(&state.pool, auth_user.kind.as_str(), auth_user.account_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/username-available?username=
///
/// Usernames are unique across influencers and brands.
pub async fn username_available(
    State(state): State<AppState>,
    Query(params): Query<UsernameQuery>,
) -> AppResult<Json<DataResponse<UsernameAvailability>>> {
    let username = normalize_username(&params.username)?;
    let available = !username_taken(&state, &username).await?;
    Ok(Json(DataResponse {
        data: UsernameAvailability {
            username,
            available,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn username_taken(state: &AppState, username: &str) -> AppResult<bool> {
    Ok(InfluencerRepo::username_exists(&state.pool, username).await?
        || BrandRepo::username_exists(&state.pool, username).await?)
}

async fn unique_referral_code(state: &AppState, name: &str) -> AppResult<String> {
    for _ in 0..REFERRAL_CODE_ATTEMPTS {
        let code = generate_referral_code(name);
        if !InfluencerRepo::referral_code_exists(&state.pool, &code).await? {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "Could not allocate a unique referral code".into(),
    ))
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(255).collect())
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
