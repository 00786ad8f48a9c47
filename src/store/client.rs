//! Typed REST client for the hosted relational store (PostgREST dialect).

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Error body returned by the store on rejected requests.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// REST client bound to one store deployment.
///
/// Carries the API key on every request; row-level policies on the
/// server decide what each identity may actually read or write.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
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

    /// `GET /rest/v1/{table}` with PostgREST query parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        debug!(table, "store select");
        let response = self
            .http
            .get(self.table_url(table))
            .headers(self.headers())
            .query(query)
            .send()
            .await?;
        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e).into())
    }

    /// `POST /rest/v1/{table}` returning the inserted row.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        debug!(table, "store insert");
        let response = self
            .http
            .post(self.table_url(table))
            .headers(self.headers())
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let text = Self::check(response).await?;
        let mut rows: Vec<T> =
            serde_json::from_str(&text).map_err(StoreError::Decode)?;
        rows.pop().ok_or_else(|| {
            StoreError::Rejected {
                status: 200,
                message: "insert returned no representation".into(),
            }
            .into()
        })
    }

    /// `POST /rest/v1/{table}` discarding the response body.
    pub async fn insert_only<B: Serialize>(&self, table: &str, body: &B) -> Result<()> {
        debug!(table, "store insert");
        let response = self
            .http
            .post(self.table_url(table))
            .headers(self.headers())
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `PATCH /rest/v1/{table}` for rows matched by the query filters.
    pub async fn update<B: Serialize>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<()> {
        debug!(table, "store update");
        let response = self
            .http
            .patch(self.table_url(table))
            .headers(self.headers())
            .query(query)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `DELETE /rest/v1/{table}` for rows matched by the query filters.
    pub async fn delete(&self, table: &str, query: &[(&str, &str)]) -> Result<()> {
        debug!(table, "store delete");
        let response = self
            .http
            .delete(self.table_url(table))
            .headers(self.headers())
            .query(query)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /rest/v1/rpc/{name}` for store-side routines.
    pub async fn rpc<B: Serialize>(&self, name: &str, args: &B) -> Result<()> {
        debug!(name, "store rpc");
        let response = self
            .http
            .post(format!("{}/rest/v1/rpc/{name}", self.base_url))
            .headers(self.headers())
            .json(args)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Map error responses to [`StoreError`], special-casing the two
    /// Postgres codes the UI reacts to.
    async fn check(response: Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }
        Err(Self::map_error(status, &text).into())
    }

    fn map_error(status: StatusCode, body: &str) -> StoreError {
        let parsed: StoreErrorBody = serde_json::from_str(body).unwrap_or(StoreErrorBody {
            code: None,
            message: None,
        });
        let message = parsed
            .message
            .unwrap_or_else(|| body.chars().take(200).collect());
        match parsed.code.as_deref() {
            Some("23505") => StoreError::DuplicateKey { message },
            Some("42501") => StoreError::PermissionDenied { message },
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_duplicate_key() {
        let err = StoreClient::map_error(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[test]
    fn rls_rejection_maps_to_permission_denied() {
        let err = StoreClient::map_error(
            StatusCode::FORBIDDEN,
            r#"{"code":"42501","message":"new row violates row-level security policy"}"#,
        );
        assert!(matches!(err, StoreError::PermissionDenied { .. }));
    }

    #[test]
    fn unknown_error_keeps_status_and_message() {
        let err = StoreClient::map_error(StatusCode::BAD_REQUEST, "not json at all");
        match err {
            StoreError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "not json at all");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
