//! One-time password generation and verification.
//!
//! Codes are six random digits. Only an HMAC-SHA256 of the code (keyed with
//! the server OTP secret and bound to the destination and purpose) is stored,
//! so a leaked `otps` table cannot be replayed.

use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of digits in a generated code.
pub const OTP_LENGTH: usize = 6;

/// Minutes a code stays valid.
pub const OTP_EXPIRY_MINS: i64 = 10;

/// Verification attempts allowed before the code is burned.
pub const MAX_VERIFY_ATTEMPTS: i32 = 5;

/// Minimum seconds between two sends to the same destination and purpose.
pub const RESEND_COOLDOWN_SECS: i64 = 30;

// ---------------------------------------------------------------------------
// Purpose
// ---------------------------------------------------------------------------

pub const PURPOSE_INFLUENCER_AUTH: &str = "influencer_auth";
pub const PURPOSE_WHATSAPP_VERIFY: &str = "whatsapp_verify";
pub const PURPOSE_BRAND_EMAIL_VERIFY: &str = "brand_email_verify";
pub const PURPOSE_BRAND_PASSWORD_RESET: &str = "brand_password_reset";

/// What an OTP was issued for. A code issued for one purpose never
/// verifies for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Influencer phone login or signup.
    InfluencerAuth,
    WhatsappVerify,
    BrandEmailVerify,
    BrandPasswordReset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InfluencerAuth => PURPOSE_INFLUENCER_AUTH,
            Self::WhatsappVerify => PURPOSE_WHATSAPP_VERIFY,
            Self::BrandEmailVerify => PURPOSE_BRAND_EMAIL_VERIFY,
            Self::BrandPasswordReset => PURPOSE_BRAND_PASSWORD_RESET,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation and hashing
// ---------------------------------------------------------------------------

/// Generate a random numeric code of [`OTP_LENGTH`] digits.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest of a code bound to its destination and purpose.
pub fn hash_code(secret: &str, destination: &str, purpose: OtpPurpose, code: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(purpose.as_str().as_bytes());
    mac.update(b":");
    mac.update(destination.as_bytes());
    mac.update(b":");
    mac.update(code.trim().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Why a submitted code was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    Expired,
    TooManyAttempts,
    Mismatch,
}

impl OtpRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Expired => "OTP has expired. Request a new one",
            Self::TooManyAttempts => "Too many incorrect attempts. Request a new OTP",
            Self::Mismatch => "Incorrect OTP",
        }
    }
}

/// The stored state of an issued code.
#[derive(Debug, Clone)]
pub struct StoredOtp<'a> {
    pub code_hash: &'a str,
    pub expires_at: Timestamp,
    pub attempts: i32,
}

/// Check a submitted code against its stored hash.
///
/// Expiry and the attempt budget are checked before the hash so that a
/// burned code cannot be brute-forced.
pub fn check(
    stored: &StoredOtp<'_>,
    submitted_hash: &str,
    now: Timestamp,
) -> Result<(), OtpRejection> {
    if now >= stored.expires_at {
        return Err(OtpRejection::Expired);
    }
    if stored.attempts >= MAX_VERIFY_ATTEMPTS {
        return Err(OtpRejection::TooManyAttempts);
    }
    if !constant_time_eq(stored.code_hash.as_bytes(), submitted_hash.as_bytes()) {
        return Err(OtpRejection::Mismatch);
    }
    Ok(())
}

/// Whether a new code may be sent, given when the last one was issued.
pub fn cooldown_remaining_secs(last_sent_at: Option<Timestamp>, now: Timestamp) -> i64 {
    match last_sent_at {
        Some(sent) => (RESEND_COOLDOWN_SECS - (now - sent).num_seconds()).max(0),
        None => 0,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}
