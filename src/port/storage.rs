//! Object storage port: upload, public URL resolution, removal.

use async_trait::async_trait;

use crate::error::Result;

/// Bucket-scoped object operations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload raw bytes under `bucket/path` with the given content type.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Public URL for an uploaded object.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove an object. Missing objects are not an error.
    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;
}
