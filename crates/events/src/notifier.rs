//! Best-effort fan-out over the configured notification channels.

use std::collections::HashMap;
use std::sync::Arc;

use crate::delivery::email::{EmailConfig, EmailDelivery, EmailError};
use crate::delivery::push::{PushClient, PushConfig, PushError};
use crate::delivery::whatsapp::{WhatsAppClient, WhatsAppConfig, WhatsAppError};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PushMessage {
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct WhatsAppMessage {
    pub phone: String,
    pub template: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// One logical notification, rendered per channel. Absent parts are skipped.
#[derive(Debug, Clone, Default)]
pub struct NotificationRequest {
    pub push: Option<PushMessage>,
    pub whatsapp: Option<WhatsAppMessage>,
    pub email: Option<EmailMessage>,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors surfaced by the synchronous OTP paths.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    WhatsApp(#[from] WhatsAppError),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Push(#[from] PushError),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Holds the optional provider clients. Cheap to clone.
#[derive(Clone, Default)]
pub struct Notifier {
    email: Option<Arc<EmailDelivery>>,
    whatsapp: Option<Arc<WhatsAppClient>>,
    push: Option<Arc<PushClient>>,
}

impl Notifier {
    pub fn new(
        email: Option<EmailDelivery>,
        whatsapp: Option<WhatsAppClient>,
        push: Option<PushClient>,
    ) -> Self {
        Self {
            email: email.map(Arc::new),
            whatsapp: whatsapp.map(Arc::new),
            push: push.map(Arc::new),
        }
    }

    /// A notifier with every channel off. OTP sends log the code instead.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build every channel whose environment is configured.
    ///
    /// A channel that is configured but fails to initialise is an error;
    /// an unconfigured channel is logged and left off.
    pub fn from_env() -> Result<Self, NotifyError> {
        let email = match EmailConfig::from_env() {
            Some(config) => Some(EmailDelivery::new(config)?),
            None => {
                tracing::warn!("SMTP_HOST not set, email delivery disabled");
                None
            }
        };
        let whatsapp = match WhatsAppConfig::from_env() {
            Some(config) => Some(WhatsAppClient::new(config)?),
            None => {
                tracing::warn!("WHATSAPP_* not set, WhatsApp delivery disabled");
                None
            }
        };
        let push = match PushConfig::from_env() {
            Some(config) => Some(PushClient::new(config)?),
            None => {
                tracing::warn!("FIREBASE_* not set, push delivery disabled");
                None
            }
        };
        Ok(Self::new(email, whatsapp, push))
    }

    /// Dispatch each part of `request` on its own task.
    ///
    /// Returns the number of tasks spawned. Delivery errors are logged and
    /// never reach the caller.
    pub fn notify(&self, request: NotificationRequest) -> usize {
        let mut spawned = 0;

        if let (Some(client), Some(msg)) = (self.push.clone(), request.push) {
            spawned += 1;
            tokio::spawn(async move {
                if let Err(e) = client
                    .send(&msg.device_token, &msg.title, &msg.body, &msg.data)
                    .await
                {
                    tracing::warn!(error = %e, title = %msg.title, "Push delivery failed");
                }
            });
        }

        if let (Some(client), Some(msg)) = (self.whatsapp.clone(), request.whatsapp) {
            spawned += 1;
            tokio::spawn(async move {
                if let Err(e) = client
                    .send_template(&msg.phone, &msg.template, &msg.params)
                    .await
                {
                    tracing::warn!(error = %e, template = %msg.template, "WhatsApp delivery failed");
                }
            });
        }

        if let (Some(client), Some(msg)) = (self.email.clone(), request.email) {
            spawned += 1;
            tokio::spawn(async move {
                if let Err(e) = client.send(&msg.to, &msg.subject, &msg.body).await {
                    tracing::warn!(error = %e, subject = %msg.subject, "Email delivery failed");
                }
            });
        }

        spawned
    }

    /// Deliver a one-time code over WhatsApp, reporting failures.
    pub async fn send_otp_whatsapp(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        match &self.whatsapp {
            Some(client) => Ok(client.send_otp(phone, code).await?),
            None => {
                tracing::debug!(phone, code, "WhatsApp disabled, OTP not delivered");
                Ok(())
            }
        }
    }

    /// Deliver a one-time code by email, reporting failures.
    pub async fn send_otp_email(
        &self,
        to: &str,
        subject: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        match &self.email {
            Some(client) => {
                let body = format!(
                    "Your verification code is {code}. It expires in {} minutes.\n\n\
                     If you did not request this code you can ignore this email.",
                    influx_core::otp::OTP_EXPIRY_MINS
                );
                Ok(client.send(to, subject, &body).await?)
            }
            None => {
                tracing::debug!(to, code, "Email disabled, OTP not delivered");
                Ok(())
            }
        }
    }
}
