//! Object storage for user uploads (profile images, banners, brand logos).
//!
//! Handlers talk to the [`ObjectStorage`] trait. Production uses
//! [`S3Storage`]; tests use [`MemoryStorage`].

pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use memory::MemoryStorage;
pub use s3::{S3Config, S3Storage};

/// Errors from a storage backend. Upload failures fail the request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Object not found: {0}")]
    NotFound(String),
}

/// Minimal object store interface.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Remove the object under `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for `key`.
    fn url_for(&self, key: &str) -> String;
}

/// Build a collision-free key: `{prefix}/{owner_id}/{uuid}.{extension}`.
pub fn object_key(prefix: &str, owner_id: i64, extension: &str) -> String {
    format!(
        "{}/{owner_id}/{}.{}",
        prefix.trim_matches('/'),
        uuid::Uuid::new_v4(),
        extension.trim_start_matches('.')
    )
}

/// Recover the key from a URL produced by `url_for`, if it has that base.
pub fn key_from_url<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(base_url.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
}
