//! Amazon S3 (or S3-compatible) backend.

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::{ObjectStorage, StorageError};

/// Default region when `S3_REGION` is not set.
const DEFAULT_REGION: &str = "ap-south-1";

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Base URL objects are served from (bucket URL or CDN).
    pub public_base_url: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2). Enables path-style.
    pub endpoint: Option<String>,
    /// Static credentials. When absent the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `S3_BUCKET` is not set.
    ///
    /// | Variable               | Required | Default                                   |
    /// |------------------------|----------|-------------------------------------------|
    /// | `S3_BUCKET`            | yes      |                                           |
    /// | `S3_REGION`            | no       | `ap-south-1`                              |
    /// | `S3_PUBLIC_BASE_URL`   | no       | `https://{bucket}.s3.{region}.amazonaws.com` |
    /// | `S3_ENDPOINT`          | no       |                                           |
    /// | `S3_ACCESS_KEY_ID`     | no       | provider chain                            |
    /// | `S3_SECRET_ACCESS_KEY` | no       | provider chain                            |
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok()?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.{region}.amazonaws.com"));
        Some(Self {
            bucket,
            region,
            public_base_url,
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
        })
    }
}

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Build the SDK client from `config`.
    pub async fn new(config: S3Config) -> Self {
        let mut loader = aws_config::from_env().region(Region::new(config.region.clone()));
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "influx-env",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %config.bucket, region = %config.region, "S3 storage configured");

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket,
            public_base_url: config.public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(key, size, "Object uploaded");
        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url.trim_end_matches('/'))
    }
}
