//! Profile review constants and validation functions.
//!
//! A complete profile enters the admin review queue as a `pending` row.
//! At most one pending review may exist per profile; the database enforces
//! this with a partial unique index.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const REVIEW_PENDING: &str = "pending";
pub const REVIEW_APPROVED: &str = "approved";
pub const REVIEW_REJECTED: &str = "rejected";

/// All valid review status values.
pub const VALID_REVIEW_STATUSES: &[&str] = &[REVIEW_PENDING, REVIEW_APPROVED, REVIEW_REJECTED];

pub const PROFILE_INFLUENCER: &str = "influencer";
pub const PROFILE_BRAND: &str = "brand";

/// All valid profile type values.
pub const VALID_PROFILE_TYPES: &[&str] = &[PROFILE_INFLUENCER, PROFILE_BRAND];

/// Maximum length for a rejection reason.
pub const MAX_REJECTION_REASON_LENGTH: usize = 1_000;

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

pub fn validate_review_status(status: &str) -> Result<(), CoreError> {
    if VALID_REVIEW_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid review status '{status}'. Must be one of: {}",
            VALID_REVIEW_STATUSES.join(", ")
        )))
    }
}

pub fn validate_profile_type(profile_type: &str) -> Result<(), CoreError> {
    if VALID_PROFILE_TYPES.contains(&profile_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid profile type '{profile_type}'. Must be one of: {}",
            VALID_PROFILE_TYPES.join(", ")
        )))
    }
}

/// A rejection must explain itself so the user knows what to fix.
pub fn validate_rejection_reason(reason: &str) -> Result<(), CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "A rejection reason is required".to_string(),
        ));
    }
    if trimmed.len() > MAX_REJECTION_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Rejection reason exceeds maximum length of {MAX_REJECTION_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Only pending reviews can be decided.
pub fn ensure_pending(status: &str) -> Result<(), CoreError> {
    if status == REVIEW_PENDING {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Review has already been {status}"
        )))
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn valid_statuses_accepted() {
        for s in VALID_REVIEW_STATUSES {
            assert!(validate_review_status(s).is_ok());
        }
        assert!(validate_review_status("archived").is_err());
    }

    #[test]
    fn profile_types() {
        assert!(validate_profile_type("influencer").is_ok());
        assert!(validate_profile_type("brand").is_ok());
        assert!(validate_profile_type("admin").is_err());
    }

    #[test]
    fn rejection_reason_required() {
        assert_matches!(validate_rejection_reason("  "), Err(CoreError::Validation(_)));
        assert!(validate_rejection_reason("Blurry profile photo").is_ok());
        let long = "x".repeat(MAX_REJECTION_REASON_LENGTH + 1);
        assert_matches!(validate_rejection_reason(&long), Err(CoreError::Validation(_)));
    }

    #[test]
    fn decided_reviews_conflict() {
        assert!(ensure_pending(REVIEW_PENDING).is_ok());
        assert_matches!(ensure_pending(REVIEW_APPROVED), Err(CoreError::Conflict(_)));
    }
}
