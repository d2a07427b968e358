//! WhatsApp delivery via the Meta Cloud API.
//!
//! Messages are sent as pre-approved templates. OTP codes use an
//! authentication template whose copy-code button carries the code as well.

use serde_json::{json, Value};

use super::REQUEST_TIMEOUT;

/// Default Graph API base including version.
const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// Default authentication template name.
const DEFAULT_OTP_TEMPLATE: &str = "otp_verification";

/// Default template language code.
const DEFAULT_LANGUAGE: &str = "en";

/// India country calling code prepended to 10-digit local numbers.
const COUNTRY_CODE: &str = "91";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("WhatsApp API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// WhatsAppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_base: String,
    pub phone_number_id: String,
    pub access_token: String,
    pub otp_template: String,
    pub language: String,
}

impl WhatsAppConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless both `WHATSAPP_PHONE_NUMBER_ID` and
    /// `WHATSAPP_ACCESS_TOKEN` are set.
    ///
    /// | Variable                    | Required | Default                           |
    /// |-----------------------------|----------|-----------------------------------|
    /// | `WHATSAPP_PHONE_NUMBER_ID`  | yes      |                                   |
    /// | `WHATSAPP_ACCESS_TOKEN`     | yes      |                                   |
    /// | `WHATSAPP_API_BASE`         | no       | `https://graph.facebook.com/v19.0`|
    /// | `WHATSAPP_OTP_TEMPLATE`     | no       | `otp_verification`                |
    /// | `WHATSAPP_TEMPLATE_LANGUAGE`| no       | `en`                              |
    pub fn from_env() -> Option<Self> {
        let phone_number_id = std::env::var("WHATSAPP_PHONE_NUMBER_ID").ok()?;
        let access_token = std::env::var("WHATSAPP_ACCESS_TOKEN").ok()?;
        Some(Self {
            api_base: std::env::var("WHATSAPP_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            phone_number_id,
            access_token,
            otp_template: std::env::var("WHATSAPP_OTP_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_OTP_TEMPLATE.to_string()),
            language: std::env::var("WHATSAPP_TEMPLATE_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// WhatsAppClient
// ---------------------------------------------------------------------------

pub struct WhatsAppClient {
    client: reqwest::Client,
    config: WhatsAppConfig,
}

impl WhatsAppClient {
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Send a body-parameter template message.
    pub async fn send_template(
        &self,
        phone: &str,
        template: &str,
        params: &[String],
    ) -> Result<(), WhatsAppError> {
        let payload = template_payload(phone, template, &self.config.language, params, None);
        self.post(&payload).await?;
        tracing::info!(template, "WhatsApp template sent");
        Ok(())
    }

    /// Send a one-time code through the authentication template.
    pub async fn send_otp(&self, phone: &str, code: &str) -> Result<(), WhatsAppError> {
        let params = [code.to_string()];
        let payload = template_payload(
            phone,
            &self.config.otp_template,
            &self.config.language,
            &params,
            Some(code),
        );
        self.post(&payload).await?;
        tracing::info!("WhatsApp OTP sent");
        Ok(())
    }

    async fn post(&self, payload: &Value) -> Result<(), WhatsAppError> {
        let url = format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::HttpStatus { status, body });
        }
        Ok(())
    }
}

/// Recipient in international digits-only form.
pub fn recipient(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

fn template_payload(
    phone: &str,
    template: &str,
    language: &str,
    params: &[String],
    button_code: Option<&str>,
) -> Value {
    let body_params: Vec<Value> = params
        .iter()
        .map(|p| json!({ "type": "text", "text": p }))
        .collect();

    let mut components = vec![json!({ "type": "body", "parameters": body_params })];
    if let Some(code) = button_code {
        components.push(json!({
            "type": "button",
            "sub_type": "url",
            "index": "0",
            "parameters": [{ "type": "text", "text": code }],
        }));
    }

    json!({
        "messaging_product": "whatsapp",
        "to": recipient(phone),
        "type": "template",
        "template": {
            "name": template,
            "language": { "code": language },
            "components": components,
        },
    })
}
