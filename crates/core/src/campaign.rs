//! Campaign, application, and invitation status rules.
//!
//! Status values are stored as text columns; the enums here are the single
//! source of truth for which transitions are legal.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Campaign status
// ---------------------------------------------------------------------------

pub const CAMPAIGN_DRAFT: &str = "draft";
pub const CAMPAIGN_ACTIVE: &str = "active";
pub const CAMPAIGN_PAUSED: &str = "paused";
pub const CAMPAIGN_COMPLETED: &str = "completed";
pub const CAMPAIGN_CANCELLED: &str = "cancelled";

pub const VALID_CAMPAIGN_STATUSES: &[&str] = &[
    CAMPAIGN_DRAFT,
    CAMPAIGN_ACTIVE,
    CAMPAIGN_PAUSED,
    CAMPAIGN_COMPLETED,
    CAMPAIGN_CANCELLED,
];

/// Campaign types.
pub const CAMPAIGN_TYPE_PAID: &str = "paid";
pub const CAMPAIGN_TYPE_BARTER: &str = "barter";
pub const VALID_CAMPAIGN_TYPES: &[&str] = &[CAMPAIGN_TYPE_PAID, CAMPAIGN_TYPE_BARTER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            CAMPAIGN_DRAFT => Ok(Self::Draft),
            CAMPAIGN_ACTIVE => Ok(Self::Active),
            CAMPAIGN_PAUSED => Ok(Self::Paused),
            CAMPAIGN_COMPLETED => Ok(Self::Completed),
            CAMPAIGN_CANCELLED => Ok(Self::Cancelled),
            _ => Err(format!(
                "Invalid campaign status '{s}'. Must be one of: {}",
                VALID_CAMPAIGN_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => CAMPAIGN_DRAFT,
            Self::Active => CAMPAIGN_ACTIVE,
            Self::Paused => CAMPAIGN_PAUSED,
            Self::Completed => CAMPAIGN_COMPLETED,
            Self::Cancelled => CAMPAIGN_CANCELLED,
        }
    }

    /// Completed and cancelled campaigns are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Draft, Active)
                | (Draft, Cancelled)
                | (Active, Paused)
                | (Active, Completed)
                | (Active, Cancelled)
                | (Paused, Active)
                | (Paused, Completed)
                | (Paused, Cancelled)
        )
    }
}

// ---------------------------------------------------------------------------
// Application status
// ---------------------------------------------------------------------------

pub const APPLICATION_APPLIED: &str = "applied";
pub const APPLICATION_UNDER_REVIEW: &str = "under_review";
pub const APPLICATION_SELECTED: &str = "selected";
pub const APPLICATION_REJECTED: &str = "rejected";
pub const APPLICATION_WITHDRAWN: &str = "withdrawn";

pub const VALID_APPLICATION_STATUSES: &[&str] = &[
    APPLICATION_APPLIED,
    APPLICATION_UNDER_REVIEW,
    APPLICATION_SELECTED,
    APPLICATION_REJECTED,
    APPLICATION_WITHDRAWN,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Selected,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            APPLICATION_APPLIED => Ok(Self::Applied),
            APPLICATION_UNDER_REVIEW => Ok(Self::UnderReview),
            APPLICATION_SELECTED => Ok(Self::Selected),
            APPLICATION_REJECTED => Ok(Self::Rejected),
            APPLICATION_WITHDRAWN => Ok(Self::Withdrawn),
            _ => Err(format!(
                "Invalid application status '{s}'. Must be one of: {}",
                VALID_APPLICATION_STATUSES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => APPLICATION_APPLIED,
            Self::UnderReview => APPLICATION_UNDER_REVIEW,
            Self::Selected => APPLICATION_SELECTED,
            Self::Rejected => APPLICATION_REJECTED,
            Self::Withdrawn => APPLICATION_WITHDRAWN,
        }
    }

    /// The influencer may withdraw only while the brand has not decided.
    pub fn can_withdraw(&self) -> bool {
        matches!(self, Self::Applied | Self::UnderReview)
    }

    /// Transitions a brand may perform. Withdrawal is influencer-only.
    pub fn brand_can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Applied, UnderReview)
                | (Applied, Selected)
                | (Applied, Rejected)
                | (UnderReview, Selected)
                | (UnderReview, Rejected)
        )
    }
}

// ---------------------------------------------------------------------------
// Invitation status
// ---------------------------------------------------------------------------

pub const INVITATION_PENDING: &str = "pending";
pub const INVITATION_ACCEPTED: &str = "accepted";
pub const INVITATION_DECLINED: &str = "declined";

/// Maximum number of influencers a brand can invite in one request.
pub const MAX_INVITES_PER_REQUEST: usize = 50;

// ---------------------------------------------------------------------------
// Targeting validation
// ---------------------------------------------------------------------------

pub const GENDER_MALE: &str = "male";
pub const GENDER_FEMALE: &str = "female";
pub const GENDER_OTHER: &str = "other";
pub const VALID_GENDERS: &[&str] = &[GENDER_MALE, GENDER_FEMALE, GENDER_OTHER];

pub const MIN_TARGET_AGE: i32 = 13;
pub const MAX_TARGET_AGE: i32 = 100;

/// Audience targeting fields shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct Targeting<'a> {
    pub is_open_to_all_ages: bool,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: bool,
    pub genders: &'a [String],
    pub is_pan_india: bool,
    pub city_count: usize,
}

/// Validate campaign audience targeting.
pub fn validate_targeting(t: &Targeting<'_>) -> Result<(), String> {
    if !t.is_open_to_all_ages {
        let (Some(min), Some(max)) = (t.min_age, t.max_age) else {
            return Err("min_age and max_age are required unless open to all ages".to_string());
        };
        if min < MIN_TARGET_AGE || max > MAX_TARGET_AGE {
            return Err(format!(
                "Age range must be within {MIN_TARGET_AGE}..={MAX_TARGET_AGE}"
            ));
        }
        if min > max {
            return Err("min_age must not exceed max_age".to_string());
        }
    }

    if !t.is_open_to_all_genders {
        if t.genders.is_empty() {
            return Err("At least one gender is required unless open to all genders".to_string());
        }
        validate_genders(t.genders)?;
    }

    if !t.is_pan_india && t.city_count == 0 {
        return Err("At least one city is required unless the campaign is pan-India".to_string());
    }

    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<(), String> {
    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(format!(
            "Invalid gender '{gender}'. Must be one of: {}",
            VALID_GENDERS.join(", ")
        ))
    }
}

fn validate_genders(genders: &[String]) -> Result<(), String> {
    genders.iter().try_for_each(|g| validate_gender(g))
}

pub fn validate_campaign_type(kind: &str) -> Result<(), String> {
    if VALID_CAMPAIGN_TYPES.contains(&kind) {
        Ok(())
    } else {
        Err(format!(
            "Invalid campaign type '{kind}'. Must be one of: {}",
            VALID_CAMPAIGN_TYPES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_transitions() {
        assert!(CampaignStatus::Draft.can_transition_to(CampaignStatus::Active));
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Paused));
        assert!(CampaignStatus::Paused.can_transition_to(CampaignStatus::Active));
        assert!(!CampaignStatus::Completed.can_transition_to(CampaignStatus::Active));
        assert!(!CampaignStatus::Cancelled.can_transition_to(CampaignStatus::Draft));
        assert!(!CampaignStatus::Active.can_transition_to(CampaignStatus::Draft));
        assert!(CampaignStatus::Completed.is_terminal());
    }

    #[test]
    fn withdrawal_blocked_after_decision() {
        assert!(ApplicationStatus::Applied.can_withdraw());
        assert!(ApplicationStatus::UnderReview.can_withdraw());
        assert!(!ApplicationStatus::Selected.can_withdraw());
        assert!(!ApplicationStatus::Rejected.can_withdraw());
        assert!(!ApplicationStatus::Withdrawn.can_withdraw());
    }

    #[test]
    fn brand_cannot_reopen_decided_application() {
        assert!(ApplicationStatus::Applied.brand_can_transition_to(ApplicationStatus::Selected));
        assert!(!ApplicationStatus::Selected.brand_can_transition_to(ApplicationStatus::Rejected));
        assert!(!ApplicationStatus::Applied.brand_can_transition_to(ApplicationStatus::Withdrawn));
        assert!(!ApplicationStatus::Withdrawn.brand_can_transition_to(ApplicationStatus::Selected));
    }

    #[test]
    fn status_strings_round_trip() {
        for s in VALID_APPLICATION_STATUSES {
            assert_eq!(ApplicationStatus::from_str_value(s).unwrap().as_str(), *s);
        }
        for s in VALID_CAMPAIGN_STATUSES {
            assert_eq!(CampaignStatus::from_str_value(s).unwrap().as_str(), *s);
        }
        assert!(CampaignStatus::from_str_value("archived").is_err());
    }

    #[test]
    fn targeting_requires_age_bounds_when_restricted() {
        let t = Targeting {
            is_open_to_all_genders: true,
            is_pan_india: true,
            ..Default::default()
        };
        assert!(validate_targeting(&t).unwrap_err().contains("min_age"));

        let t = Targeting {
            min_age: Some(30),
            max_age: Some(20),
            ..t
        };
        assert!(validate_targeting(&t).unwrap_err().contains("must not exceed"));

        let t = Targeting {
            min_age: Some(18),
            max_age: Some(30),
            ..t
        };
        assert!(validate_targeting(&t).is_ok());
    }

    #[test]
    fn targeting_rejects_unknown_gender_and_missing_cities() {
        let genders = vec!["female".to_string(), "robot".to_string()];
        let t = Targeting {
            is_open_to_all_ages: true,
            genders: &genders,
            is_pan_india: true,
            ..Default::default()
        };
        assert!(validate_targeting(&t).unwrap_err().contains("robot"));

        let t = Targeting {
            is_open_to_all_ages: true,
            is_open_to_all_genders: true,
            is_pan_india: false,
            city_count: 0,
            ..Default::default()
        };
        assert!(validate_targeting(&t).unwrap_err().contains("city"));
    }
}
