//! Client for the external workflow-automation webhook.
//!
//! Two endpoints: the chat endpoint behind the virtual tutor, and the
//! document-ingestion endpoint for the knowledge base. Chat messages
//! are retried with a linearly increasing delay; this is the only
//! retrying client in the crate. Forum and store mutations never retry.

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::WebhookConfig;
use crate::domain::UserId;
use crate::error::{Result, ValidationError, WebhookError};

/// Session ID used when the caller does not track its own.
pub const DEFAULT_SESSION_ID: &str = "virtual-tutor-session";

/// Maximum document size accepted for ingestion.
pub const INGEST_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Document types the ingestion pipeline accepts.
pub const INGEST_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/csv",
    "application/json",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

/// JSON envelope POSTed to the chat endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// ISO-8601 timestamp of the send.
    pub timestamp: String,
    pub session_id: String,
    pub metadata: ClientMetadata,
}

/// Client identification sent with every chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
}

impl Default for ClientMetadata {
    fn default() -> Self {
        Self {
            user_agent: concat!("aula/", env!("CARGO_PKG_VERSION")).to_string(),
            platform: std::env::consts::OS.to_string(),
            language: std::env::var("LANG").unwrap_or_else(|_| "en".into()),
        }
    }
}

/// Free-form reply from the chat endpoint. The workflow is expected,
/// but not guaranteed, to fill either `output` or `response`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatReply {
    /// The displayable reply text, wherever the workflow put it.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        self.output.as_deref().or(self.response.as_deref())
    }
}

/// A document handed to the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Reject unsupported types and oversized files before any upload.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if !INGEST_ALLOWED_TYPES.contains(&self.mime.as_str()) {
            return Err(ValidationError::UnsupportedDocument {
                mime: self.mime.clone(),
            });
        }
        let size = self.bytes.len() as u64;
        if size > INGEST_MAX_BYTES {
            return Err(ValidationError::FileTooLarge {
                size,
                max: INGEST_MAX_BYTES,
            });
        }
        Ok(())
    }
}

/// Receipt returned by the ingestion endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<IngestDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestDetails {
    #[serde(default)]
    pub chunks_processed: u64,
}

/// Webhook client with endpoints and retry policy injected at
/// construction time.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    config: WebhookConfig,
}

impl WebhookClient {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Send a chat message and return the parsed reply.
    ///
    /// Retries up to `max_retries` attempts total; attempt `n` waits
    /// `n * retry_delay` before the next try.
    pub async fn send_message(
        &self,
        message: &str,
        user_id: Option<&UserId>,
        session_id: &str,
    ) -> Result<ChatReply> {
        let envelope = ChatEnvelope {
            message: message.to_string(),
            user_id: user_id.cloned(),
            timestamp: Utc::now().to_rfc3339(),
            session_id: session_id.to_string(),
            metadata: ClientMetadata::default(),
        };

        let max = self.config.max_retries;
        let mut attempt = 1;
        loop {
            match self.post_chat(&envelope).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < max => {
                    let delay = self.config.retry_delay() * attempt;
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "webhook attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(WebhookError::RetriesExhausted {
                        attempts: max,
                        source: Box::new(e),
                    }
                    .into())
                }
            }
        }
    }

    async fn post_chat(&self, envelope: &ChatEnvelope) -> std::result::Result<ChatReply, WebhookError> {
        let response = self
            .http
            .post(&self.config.chat_url)
            .header("User-Agent", ClientMetadata::default().user_agent)
            .json(envelope)
            .send()
            .await
            .map_err(WebhookError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(WebhookError::Transport)
    }

    /// Probe connectivity without sending an actual message.
    ///
    /// Any response below 500 counts as reachable; even a 404 means the
    /// server answered. Transport failures count as unreachable.
    pub async fn test_connection(&self) -> bool {
        let result = self
            .http
            .head(&self.config.chat_url)
            .header("User-Agent", ClientMetadata::default().user_agent)
            .send()
            .await;
        match result {
            Ok(response) => response.status().as_u16() < 500,
            Err(e) => {
                debug!(error = %e, "webhook connectivity probe failed");
                false
            }
        }
    }

    /// Upload a document to the ingestion endpoint as a multipart form.
    ///
    /// Validation happens before any bytes leave the process. Ingestion
    /// does not retry; a failed upload is reported immediately.
    pub async fn ingest_document(
        &self,
        document: DocumentUpload,
        user_id: &UserId,
        user_email: &str,
        course_id: &str,
    ) -> Result<IngestReceipt> {
        document.validate()?;

        let part = Part::bytes(document.bytes)
            .file_name(document.file_name.clone())
            .mime_str(&document.mime)?;
        let form = Form::new()
            .part("file", part)
            .text("fileName", document.file_name)
            .text("fileType", document.mime)
            .text("userId", user_id.to_string())
            .text("userEmail", user_email.to_string())
            .text("courseId", course_id.to_string())
            .text("timestamp", Utc::now().to_rfc3339());

        let response = self
            .http
            .post(&self.config.ingest_url)
            .multipart(form)
            .send()
            .await
            .map_err(WebhookError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response.json().await.map_err(WebhookError::Transport)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_prefers_output_over_response() {
        let reply = ChatReply {
            output: Some("from output".into()),
            response: Some("from response".into()),
            ..Default::default()
        };
        assert_eq!(reply.reply_text(), Some("from output"));

        let reply = ChatReply {
            response: Some("from response".into()),
            ..Default::default()
        };
        assert_eq!(reply.reply_text(), Some("from response"));

        assert_eq!(ChatReply::default().reply_text(), None);
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let envelope = ChatEnvelope {
            message: "hola".into(),
            user_id: Some(UserId::new("u1")),
            timestamp: "2026-01-01T00:00:00Z".into(),
            session_id: DEFAULT_SESSION_ID.into(),
            metadata: ClientMetadata {
                user_agent: "test".into(),
                platform: "linux".into(),
                language: "es".into(),
            },
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["sessionId"], DEFAULT_SESSION_ID);
        assert_eq!(json["metadata"]["userAgent"], "test");
    }

    #[test]
    fn envelope_omits_missing_user() {
        let envelope = ChatEnvelope {
            message: "hola".into(),
            user_id: None,
            timestamp: "2026-01-01T00:00:00Z".into(),
            session_id: DEFAULT_SESSION_ID.into(),
            metadata: ClientMetadata::default(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn document_validation_rejects_unknown_type() {
        let doc = DocumentUpload {
            file_name: "virus.exe".into(),
            mime: "application/octet-stream".into(),
            bytes: vec![0; 8],
        };
        assert!(matches!(
            doc.validate(),
            Err(ValidationError::UnsupportedDocument { .. })
        ));
    }

    #[test]
    fn document_validation_accepts_pdf() {
        let doc = DocumentUpload {
            file_name: "notes.pdf".into(),
            mime: "application/pdf".into(),
            bytes: vec![0; 8],
        };
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn receipt_parses_chunk_details() {
        let receipt: IngestReceipt = serde_json::from_str(
            r#"{"success":true,"details":{"chunksProcessed":12}}"#,
        )
        .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.details.unwrap().chunks_processed, 12);
    }
}
