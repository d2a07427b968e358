//! Profile completion checklists for influencers and brands.
//!
//! A profile is complete when every item of its checklist holds. Completion
//! is what moves a profile into the admin review queue, so the checklist is
//! evaluated after every profile mutation. Evaluation runs against borrowed
//! facts extracted from the profile row by the caller.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Checklist item names
// ---------------------------------------------------------------------------

pub const ITEM_NAME: &str = "name";
pub const ITEM_BIO: &str = "bio";
pub const ITEM_PROFILE_IMAGE: &str = "profile_image";
pub const ITEM_LOCATION: &str = "location";
pub const ITEM_WHATSAPP_VERIFIED: &str = "whatsapp_verified";
pub const ITEM_SOCIAL_LINK: &str = "social_link";
pub const ITEM_COLLABORATION_COSTS: &str = "collaboration_costs";

pub const ITEM_BRAND_NAME: &str = "brand_name";
pub const ITEM_LEGAL_ENTITY_NAME: &str = "legal_entity_name";
pub const ITEM_COMPANY_ADDRESS: &str = "company_address";
pub const ITEM_BRAND_BIO: &str = "brand_bio";
pub const ITEM_POC_NAME: &str = "poc_name";
pub const ITEM_POC_EMAIL: &str = "poc_email";
pub const ITEM_POC_CONTACT: &str = "poc_contact_number";
pub const ITEM_NICHES: &str = "niches";
pub const ITEM_EMAIL_VERIFIED: &str = "email_verified";

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// The influencer fields the checklist looks at.
#[derive(Debug, Clone, Default)]
pub struct InfluencerProfileFacts<'a> {
    pub name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
    pub has_city: bool,
    pub is_whatsapp_verified: bool,
    pub social_links: [Option<&'a str>; 5],
    /// JSON object of `platform -> { deliverable -> amount }`.
    pub collaboration_costs: Option<&'a serde_json::Value>,
}

/// The brand fields the checklist looks at.
#[derive(Debug, Clone, Default)]
pub struct BrandProfileFacts<'a> {
    pub brand_name: Option<&'a str>,
    pub legal_entity_name: Option<&'a str>,
    pub company_address: Option<&'a str>,
    pub brand_bio: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
    pub poc_name: Option<&'a str>,
    pub poc_email: Option<&'a str>,
    pub poc_contact_number: Option<&'a str>,
    pub niche_count: usize,
    pub is_email_verified: bool,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of evaluating a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCompletion {
    pub is_complete: bool,
    pub completed: Vec<&'static str>,
    pub missing: Vec<&'static str>,
    pub percentage: u8,
}

impl ProfileCompletion {
    fn from_items(items: &[(&'static str, bool)]) -> Self {
        let (done, todo): (Vec<(&'static str, bool)>, Vec<_>) =
            items.iter().partition(|(_, ok)| *ok);
        let completed: Vec<&'static str> = done.into_iter().map(|(name, _)| name).collect();
        let missing: Vec<&'static str> = todo.into_iter().map(|(name, _)| name).collect();

        let percentage = if items.is_empty() {
            100
        } else {
            ((completed.len() as f64 / items.len() as f64) * 100.0).round() as u8
        };

        Self {
            is_complete: missing.is_empty(),
            completed,
            missing,
            percentage,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate the influencer checklist.
pub fn evaluate_influencer(facts: &InfluencerProfileFacts<'_>) -> ProfileCompletion {
    let items = [
        (ITEM_NAME, is_filled(facts.name)),
        (ITEM_BIO, is_filled(facts.bio)),
        (ITEM_PROFILE_IMAGE, is_filled(facts.profile_image_url)),
        (ITEM_LOCATION, facts.has_city),
        (ITEM_WHATSAPP_VERIFIED, facts.is_whatsapp_verified),
        (
            ITEM_SOCIAL_LINK,
            facts.social_links.iter().any(|link| is_filled(*link)),
        ),
        (
            ITEM_COLLABORATION_COSTS,
            facts.collaboration_costs.is_some_and(has_positive_cost),
        ),
    ];
    ProfileCompletion::from_items(&items)
}

/// Evaluate the brand checklist.
pub fn evaluate_brand(facts: &BrandProfileFacts<'_>) -> ProfileCompletion {
    let items = [
        (ITEM_BRAND_NAME, is_filled(facts.brand_name)),
        (ITEM_LEGAL_ENTITY_NAME, is_filled(facts.legal_entity_name)),
        (ITEM_COMPANY_ADDRESS, is_filled(facts.company_address)),
        (ITEM_BRAND_BIO, is_filled(facts.brand_bio)),
        (ITEM_PROFILE_IMAGE, is_filled(facts.profile_image_url)),
        (ITEM_POC_NAME, is_filled(facts.poc_name)),
        (ITEM_POC_EMAIL, is_filled(facts.poc_email)),
        (ITEM_POC_CONTACT, is_filled(facts.poc_contact_number)),
        (ITEM_NICHES, facts.niche_count > 0),
        (ITEM_EMAIL_VERIFIED, facts.is_email_verified),
    ];
    ProfileCompletion::from_items(&items)
}

/// Whether a completion change should enqueue a profile review.
///
/// Only the incomplete -> complete edge triggers submission; re-saving an
/// already complete profile does not.
pub fn became_complete(was_complete: bool, now: &ProfileCompletion) -> bool {
    !was_complete && now.is_complete
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// True when any leaf of the cost object is a number greater than zero.
fn has_positive_cost(costs: &serde_json::Value) -> bool {
    match costs {
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v > 0.0),
        serde_json::Value::Object(map) => map.values().any(has_positive_cost),
        serde_json::Value::Array(items) => items.iter().any(has_positive_cost),
        _ => false,
    }
}
