//! Campaign eligibility rules.
//!
//! The discovery listing expresses these predicates as SQL so that paging
//! stays in the database; this module is the authoritative evaluation used
//! when an influencer applies, and reports the first rule that failed.

use chrono::{Datelike, Duration};
use serde::Serialize;

use crate::types::{Date, DbId, Timestamp};

/// Length of the Pro-only early access window after a campaign goes live.
pub const EARLY_ACCESS_HOURS: i64 = 24;

/// The influencer side of an eligibility check.
#[derive(Debug, Clone, Default)]
pub struct InfluencerFacts<'a> {
    pub niche_ids: &'a [DbId],
    pub date_of_birth: Option<Date>,
    pub gender: Option<&'a str>,
    pub city_id: Option<DbId>,
    pub is_pro: bool,
    pub is_invited: bool,
}

/// The campaign side of an eligibility check.
#[derive(Debug, Clone)]
pub struct CampaignFacts<'a> {
    pub is_live: bool,
    pub niche_ids: &'a [DbId],
    pub is_open_to_all_ages: bool,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub is_open_to_all_genders: bool,
    pub genders: &'a [String],
    pub is_pan_india: bool,
    pub city_ids: &'a [DbId],
    pub is_invite_only: bool,
    /// When the campaign went live; the early access window starts here.
    pub published_at: Timestamp,
}

/// The first rule an influencer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    CampaignClosed,
    InviteOnly,
    EarlyAccessProOnly,
    NicheMismatch,
    AgeMismatch,
    GenderMismatch,
    LocationMismatch,
}

impl Ineligibility {
    /// Human-readable explanation surfaced in 403 responses.
    pub fn message(&self) -> &'static str {
        match self {
            Self::CampaignClosed => "Campaign is not accepting applications",
            Self::InviteOnly => "Campaign is invite-only",
            Self::EarlyAccessProOnly => "Campaign is in Pro early access",
            Self::NicheMismatch => "Your niches do not match this campaign",
            Self::AgeMismatch => "Your age does not match this campaign",
            Self::GenderMismatch => "Your gender does not match this campaign",
            Self::LocationMismatch => "Your city is not targeted by this campaign",
        }
    }
}

/// Whether `now` still falls inside the Pro early access window.
pub fn in_early_access(published_at: Timestamp, now: Timestamp) -> bool {
    now < published_at + Duration::hours(EARLY_ACCESS_HOURS)
}

/// Full years elapsed between `dob` and `today`.
pub fn age_on(dob: Date, today: Date) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Evaluate every rule in order, stopping at the first failure.
pub fn evaluate(
    influencer: &InfluencerFacts<'_>,
    campaign: &CampaignFacts<'_>,
    now: Timestamp,
) -> Result<(), Ineligibility> {
    if !campaign.is_live {
        return Err(Ineligibility::CampaignClosed);
    }

    // Invited influencers skip targeting and early access.
    if influencer.is_invited {
        return Ok(());
    }

    if campaign.is_invite_only {
        return Err(Ineligibility::InviteOnly);
    }

    if in_early_access(campaign.published_at, now) && !influencer.is_pro {
        return Err(Ineligibility::EarlyAccessProOnly);
    }

    if !campaign.niche_ids.is_empty()
        && !campaign
            .niche_ids
            .iter()
            .any(|id| influencer.niche_ids.contains(id))
    {
        return Err(Ineligibility::NicheMismatch);
    }

    if !campaign.is_open_to_all_ages {
        let age = influencer
            .date_of_birth
            .map(|dob| age_on(dob, now.date_naive()))
            .ok_or(Ineligibility::AgeMismatch)?;
        let min = campaign.min_age.unwrap_or(i32::MIN);
        let max = campaign.max_age.unwrap_or(i32::MAX);
        if age < min || age > max {
            return Err(Ineligibility::AgeMismatch);
        }
    }

    if !campaign.is_open_to_all_genders {
        let gender = influencer.gender.ok_or(Ineligibility::GenderMismatch)?;
        if !campaign.genders.iter().any(|g| g == gender) {
            return Err(Ineligibility::GenderMismatch);
        }
    }

    if !campaign.is_pan_india {
        let city = influencer.city_id.ok_or(Ineligibility::LocationMismatch)?;
        if !campaign.city_ids.contains(&city) {
            return Err(Ineligibility::LocationMismatch);
        }
    }

    Ok(())
}
