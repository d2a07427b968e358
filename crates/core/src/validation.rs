//! Input format validation shared by signup and profile updates.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Maximum length of a bio (influencer) or brand bio.
pub const MAX_BIO_LENGTH: usize = 1_000;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.]+$").expect("valid regex"));

/// Ten-digit Indian mobile number starting with 6-9.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid regex"));

/// UPI virtual payment address, e.g. `name@bank`.
static UPI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]{2,256}@[a-zA-Z]{2,64}$").expect("valid regex"));

/// Normalize and validate a username. Usernames are stored lowercase.
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let username = raw.trim().to_lowercase();
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(&username) {
        return Err(CoreError::Validation(
            "Username may only contain letters, digits, '_' and '.'".to_string(),
        ));
    }
    if username.starts_with('.') || username.ends_with('.') {
        return Err(CoreError::Validation(
            "Username cannot start or end with '.'".to_string(),
        ));
    }
    Ok(username)
}

/// Normalize and validate an Indian mobile number.
///
/// Accepts an optional `+91` / `91` / `0` prefix and embedded spaces or
/// dashes; returns the bare ten digits.
pub fn normalize_phone(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.len() {
        12 if digits.starts_with("91") => &digits[2..],
        11 if digits.starts_with('0') => &digits[1..],
        _ => digits.as_str(),
    };
    if PHONE_RE.is_match(local) {
        Ok(local.to_string())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid phone number '{raw}'"
        )))
    }
}

/// Normalize and validate an email address. Emails are stored lowercase.
pub fn normalize_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim().to_lowercase();
    if email.validate_email() {
        Ok(email)
    } else {
        Err(CoreError::Validation(format!("Invalid email address '{raw}'")))
    }
}

pub fn validate_upi_id(upi_id: &str) -> Result<(), CoreError> {
    if UPI_RE.is_match(upi_id.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid UPI id '{upi_id}'")))
    }
}

pub fn validate_bio(bio: &str) -> Result<(), CoreError> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(CoreError::Validation(format!(
            "Bio exceeds maximum length of {MAX_BIO_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional http(s) link such as a social profile URL.
pub fn validate_link(field: &str, value: &str) -> Result<(), CoreError> {
    let v = value.trim();
    if v.is_empty() || v.starts_with("https://") || v.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be an http(s) URL"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_normalized_to_lowercase() {
        assert_eq!(normalize_username("  Asha_Rao ").unwrap(), "asha_rao");
    }

    #[test]
    fn username_rejects_bad_input() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username(".dotted").is_err());
        assert!(normalize_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn phone_prefixes_are_stripped() {
        assert_eq!(normalize_phone("+91 98765-43210").unwrap(), "9876543210");
        assert_eq!(normalize_phone("09876543210").unwrap(), "9876543210");
        assert_eq!(normalize_phone("9876543210").unwrap(), "9876543210");
    }

    #[test]
    fn phone_rejects_invalid_numbers() {
        assert!(normalize_phone("5876543210").is_err());
        assert!(normalize_phone("98765").is_err());
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn email_lowercased_and_checked() {
        assert_eq!(normalize_email(" Ravi@Chai.CO ").unwrap(), "ravi@chai.co");
        assert!(normalize_email("not-an-email").is_err());
    }

    #[test]
    fn upi_format() {
        assert!(validate_upi_id("asha.rao@okaxis").is_ok());
        assert!(validate_upi_id("asha.rao").is_err());
        assert!(validate_upi_id("@okaxis").is_err());
    }

    #[test]
    fn links_must_be_http() {
        assert!(validate_link("instagram_url", "https://instagram.com/x").is_ok());
        assert!(validate_link("instagram_url", "").is_ok());
        assert!(validate_link("instagram_url", "instagram.com/x").is_err());
    }
}
