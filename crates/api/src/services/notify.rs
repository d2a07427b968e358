//! Best-effort user notifications.
//!
//! Every notice is written to the in-app feed and pushed to the account's
//! device when it has one. Influencers with a verified WhatsApp number also
//! get a template message for the notices that have one. Brands also get an
//! email. Nothing here returns an
//! error: failures are logged and the request carries on.

use std::collections::HashMap;

use influx_core::accounts::AccountKind;
use influx_core::types::DbId;
use influx_db::models::brand::Brand;
use influx_db::models::influencer::Influencer;
use influx_db::models::notification::CreateNotification;
use influx_db::repositories::{BrandRepo, InfluencerRepo, NotificationRepo};
use influx_events::{EmailMessage, NotificationRequest, PushMessage, WhatsAppMessage};

use crate::state::AppState;

pub const KIND_PROFILE_SUBMITTED: &str = "profile_submitted";
pub const KIND_PROFILE_APPROVED: &str = "profile_approved";
pub const KIND_PROFILE_REJECTED: &str = "profile_rejected";
pub const KIND_APPLICATION_RECEIVED: &str = "application_received";
pub const KIND_APPLICATION_UPDATED: &str = "application_updated";
pub const KIND_CAMPAIGN_INVITATION: &str = "campaign_invitation";
pub const KIND_INVITATION_RESPONDED: &str = "invitation_responded";
pub const KIND_REFERRAL_REWARD: &str = "referral_reward";
pub const KIND_REDEMPTION_UPDATED: &str = "redemption_updated";
pub const KIND_PRO_GRANTED: &str = "pro_granted";

/// A message for one account.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: &'static str,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

impl Notice {
    pub fn new(kind: &'static str, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

pub async fn influencer(state: &AppState, influencer: &Influencer, notice: Notice) {
    record(state, AccountKind::Influencer, influencer.id, &notice).await;

    let request = NotificationRequest {
        push: push_message(influencer.device_token.as_deref(), &notice),
        whatsapp: whatsapp_message(influencer, &notice),
        ..Default::default()
    };
    state.notifier.notify(request);
}

pub async fn influencer_by_id(state: &AppState, influencer_id: DbId, notice: Notice) {
    match InfluencerRepo::find_by_id(&state.pool, influencer_id).await {
        Ok(Some(row)) => influencer(state, &row, notice).await,
        Ok(None) => tracing::warn!(influencer_id, kind = notice.kind, "Notice for missing influencer"),
        Err(e) => tracing::error!(error = %e, influencer_id, "Failed to load influencer for notice"),
    }
}

pub async fn brand(state: &AppState, brand: &Brand, notice: Notice) {
    record(state, AccountKind::Brand, brand.id, &notice).await;

    let request = NotificationRequest {
        push: push_message(brand.device_token.as_deref(), &notice),
        email: Some(EmailMessage {
            to: brand.email.clone(),
            subject: notice.title.clone(),
            body: notice.body.clone(),
        }),
        ..Default::default()
    };
    state.notifier.notify(request);
}

pub async fn brand_by_id(state: &AppState, brand_id: DbId, notice: Notice) {
    match BrandRepo::find_by_id(&state.pool, brand_id).await {
        Ok(Some(row)) => brand(state, &row, notice).await,
        Ok(None) => tracing::warn!(brand_id, kind = notice.kind, "Notice for missing brand"),
        Err(e) => tracing::error!(error = %e, brand_id, "Failed to load brand for notice"),
    }
}

async fn record(state: &AppState, kind: AccountKind, account_id: DbId, notice: &Notice) {
    let input = CreateNotification {
        account_kind: kind.as_str().to_string(),
        account_id,
        kind: notice.kind.to_string(),
        title: notice.title.clone(),
        body: notice.body.clone(),
        data: notice.data.clone(),
    };
    if let Err(e) = NotificationRepo::create(&state.pool, &input).await {
        tracing::error!(error = %e, account_id, kind = notice.kind, "Failed to record notification");
    }
}

fn push_message(device_token: Option<&str>, notice: &Notice) -> Option<PushMessage> {
    let token = device_token.filter(|t| !t.is_empty())?;
    Some(PushMessage {
        device_token: token.to_string(),
        title: notice.title.clone(),
        body: notice.body.clone(),
        data: push_data(notice),
    })
}

/// WhatsApp template for a notice kind. Kinds without one stay in-app and push.
fn whatsapp_template(kind: &str) -> Option<&'static str> {
    match kind {
        KIND_PROFILE_APPROVED => Some("profile_approved"),
        KIND_PROFILE_REJECTED => Some("profile_rejected"),
        KIND_APPLICATION_UPDATED => Some("application_update"),
        KIND_CAMPAIGN_INVITATION => Some("campaign_invitation"),
        _ => None,
    }
}

/// Template parameters are the recipient's name and the notice body.
fn whatsapp_message(influencer: &Influencer, notice: &Notice) -> Option<WhatsAppMessage> {
    if !influencer.is_whatsapp_verified {
        return None;
    }
    let template = whatsapp_template(notice.kind)?;
    let phone = influencer
        .whatsapp_number
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&influencer.phone);
    Some(WhatsAppMessage {
        phone: phone.to_string(),
        template: template.to_string(),
        params: vec![influencer.name.clone(), notice.body.clone()],
    })
}

/// FCM data payloads are string-to-string maps.
fn push_data(notice: &Notice) -> HashMap<String, String> {
    let mut data = HashMap::from([("kind".to_string(), notice.kind.to_string())]);
    if let Some(object) = notice.data.as_object() {
        for (key, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            data.insert(key.clone(), value);
        }
    }
    data
}
