//! Object storage client for image attachments and cover images.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Storage client bound to the same deployment as the relational store.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Build the per-user object path for an upload: `{user}/{uuid}.{ext}`.
///
/// Scoping by user ID keeps ownership visible to storage policies and
/// avoids collisions between uploads with the same original name.
#[must_use]
pub fn object_path(user_id: &str, file_name: &str) -> String {
    let key = Uuid::new_v4();
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{user_id}/{key}.{ext}"),
        _ => format!("{user_id}/{key}"),
    }
}

impl StorageClient {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

#[async_trait]
impl crate::port::ObjectStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        debug!(bucket, path, size = bytes.len(), "storage upload");
        let mut headers = self.headers();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        let response = self
            .http
            .post(self.object_url(bucket, path))
            .headers(headers)
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        debug!(bucket, path, "storage remove");
        let response = self
            .http
            .delete(self.object_url(bucket, path))
            .headers(self.headers())
            .send()
            .await?;
        Self::check(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_keeps_extension_and_user_prefix() {
        let path = object_path("user-1", "photo.PNG");
        assert!(path.starts_with("user-1/"));
        assert!(path.ends_with(".PNG"));
    }

    #[test]
    fn object_path_without_extension() {
        let path = object_path("user-1", "photo");
        assert!(path.starts_with("user-1/"));
        assert!(!path.contains('.'));
    }

    #[test]
    fn object_paths_are_unique_per_upload() {
        assert_ne!(object_path("u", "a.png"), object_path("u", "a.png"));
    }
}
