//! Push delivery via Firebase Cloud Messaging (HTTP v1).
//!
//! Authentication uses a service-account assertion signed with RS256 and
//! exchanged for an OAuth2 access token. The token is cached until shortly
//! before it expires.

use std::collections::HashMap;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use super::REQUEST_TIMEOUT;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_API_BASE: &str = "https://fcm.googleapis.com";
const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the cached access token this long before it expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service-account key could not be parsed or the assertion signed.
    #[error("Credential error: {0}")]
    Credential(#[from] jsonwebtoken::errors::Error),

    #[error("FCM returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// PushConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub project_id: String,
    pub client_email: String,
    /// PEM-encoded RSA private key of the service account.
    pub private_key: String,
    pub token_uri: String,
    pub api_base: String,
}

impl PushConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless `FIREBASE_PROJECT_ID`, `FIREBASE_CLIENT_EMAIL` and
    /// `FIREBASE_PRIVATE_KEY` are all set. Literal `\n` sequences in the key
    /// are turned into newlines.
    pub fn from_env() -> Option<Self> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID").ok()?;
        let client_email = std::env::var("FIREBASE_CLIENT_EMAIL").ok()?;
        let private_key = std::env::var("FIREBASE_PRIVATE_KEY").ok()?.replace("\\n", "\n");
        Some(Self {
            project_id,
            client_email,
            private_key,
            token_uri: std::env::var("FIREBASE_TOKEN_URI")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URI.to_string()),
            api_base: std::env::var("FCM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// PushClient
// ---------------------------------------------------------------------------

/// Claims of the service-account assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

pub struct PushClient {
    client: reqwest::Client,
    config: PushConfig,
    signing_key: EncodingKey,
    token: Mutex<Option<CachedToken>>,
}

impl PushClient {
    pub fn new(config: PushConfig) -> Result<Self, PushError> {
        let signing_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            config,
            signing_key,
            token: Mutex::new(None),
        })
    }

    /// Send a notification to one device.
    pub async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> Result<(), PushError> {
        let access_token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.config.api_base.trim_end_matches('/'),
            self.config.project_id
        );
        let payload = json!({
            "message": {
                "token": device_token,
                "notification": { "title": title, "body": body },
                "data": data,
            }
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::HttpStatus { status, body });
        }

        tracing::info!(title, "Push notification sent");
        Ok(())
    }

    /// Return a cached access token or fetch a new one.
    async fn access_token(&self) -> Result<String, PushError> {
        let mut cached = self.token.lock().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - TOKEN_REFRESH_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .client
            .post(&self.config.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::HttpStatus { status, body });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "FCM access token refreshed");
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }

    fn sign_assertion(&self, now: i64) -> Result<String, PushError> {
        let claims = AssertionClaims {
            iss: &self.config.client_email,
            scope: FCM_SCOPE,
            aud: &self.config.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.signing_key,
        )?;
        Ok(token)
    }
}
