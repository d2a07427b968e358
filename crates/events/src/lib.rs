//! Outbound notification channels.
//!
//! - [`delivery`]: provider clients for email (SMTP), WhatsApp (Meta Cloud
//!   API) and push (Firebase Cloud Messaging HTTP v1).
//! - [`Notifier`]: fans a [`NotificationRequest`] out to every configured
//!   channel on background tasks. Failures are logged, never returned.
//!   OTP delivery is the exception and reports errors to the caller.

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::push::{PushClient, PushConfig, PushError};
pub use delivery::whatsapp::{WhatsAppClient, WhatsAppConfig, WhatsAppError};
pub use notifier::{
    EmailMessage, NotificationRequest, Notifier, NotifyError, PushMessage, WhatsAppMessage,
};
