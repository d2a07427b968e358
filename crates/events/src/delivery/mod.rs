//! External delivery channels for user notifications.

pub mod email;
pub mod push;
pub mod whatsapp;

use std::time::Duration;

/// HTTP request timeout for a single provider call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
