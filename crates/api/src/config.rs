use crate::auth::jwt::JwtConfig;

/// Default request body limit for multipart uploads (6 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after the server drains (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body, sized for image uploads.
    pub max_upload_bytes: usize,
    /// Database pool size (default: `10`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    /// First admin account, created at startup when no admin exists.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

/// One-time password settings.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// HMAC key for stored code digests.
    pub secret: String,
    /// Fixed code for development and tests. Never set in production.
    pub static_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `MAX_UPLOAD_BYTES`       | `6291456`                  |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                     |
    /// | `OTP_SECRET`             | required                   |
    /// | `OTP_STATIC_CODE`        | unset                      |
    /// | `ADMIN_BOOTSTRAP_EMAIL`  | unset                      |
    /// | `ADMIN_BOOTSTRAP_PASSWORD` | unset                    |
    /// | `ADMIN_BOOTSTRAP_NAME`   | `Administrator`            |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a missing secret. Misconfiguration
    /// fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let db_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            db_max_connections,
            jwt: JwtConfig::from_env(),
            otp: OtpConfig::from_env(),
            admin_bootstrap: AdminBootstrap::from_env(),
        }
    }
}

impl OtpConfig {
    /// # Panics
    ///
    /// Panics if `OTP_SECRET` is missing or `OTP_STATIC_CODE` is not six digits.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("OTP_SECRET").expect("OTP_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "OTP_SECRET must not be empty");

        let static_code = std::env::var("OTP_STATIC_CODE").ok().filter(|c| !c.is_empty());
        if let Some(code) = &static_code {
            assert!(
                is_valid_static_code(code),
                "OTP_STATIC_CODE must be {} digits",
                influx_core::otp::OTP_LENGTH
            );
            tracing::warn!("OTP_STATIC_CODE is set; every OTP will use the fixed code");
        }

        Self {
            secret,
            static_code,
        }
    }
}

impl AdminBootstrap {
    fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_BOOTSTRAP_EMAIL").ok()?;
        let password = std::env::var("ADMIN_BOOTSTRAP_PASSWORD").ok()?;
        let name =
            std::env::var("ADMIN_BOOTSTRAP_NAME").unwrap_or_else(|_| "Administrator".into());
        Some(Self {
            name,
            email,
            password,
        })
    }
}

fn is_valid_static_code(code: &str) -> bool {
    code.len() == influx_core::otp::OTP_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}
