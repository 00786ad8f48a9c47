mod support;

use std::time::{Duration, Instant};

use aula::config::WebhookConfig;
use aula::domain::UserId;
use aula::error::{Error, WebhookError};
use aula::webhook::{DocumentUpload, WebhookClient, DEFAULT_SESSION_ID};

use support::http::{StubResponse, StubServer};

const RETRY_DELAY_MS: u64 = 50;

fn webhook_config(chat_url: String, ingest_url: String) -> WebhookConfig {
    WebhookConfig {
        chat_url,
        ingest_url,
        max_retries: 3,
        retry_delay_ms: RETRY_DELAY_MS,
    }
}

#[tokio::test]
async fn chat_retries_with_growing_delays_until_a_success() {
    let server = StubServer::start(vec![
        StubResponse::server_error(),
        StubResponse::server_error(),
        StubResponse::ok(r#"{"output":"hello there"}"#),
    ])
    .await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    let started = Instant::now();
    let reply = client
        .send_message("hi", Some(&UserId::new("u1")), DEFAULT_SESSION_ID)
        .await
        .expect("third attempt succeeds");

    assert_eq!(reply.reply_text(), Some("hello there"));
    assert_eq!(server.hits(), 3);
    // The two failures wait 1x then 2x the base delay before retrying
    assert!(started.elapsed() >= Duration::from_millis(3 * RETRY_DELAY_MS));
}

#[tokio::test]
async fn chat_gives_up_after_the_configured_attempts() {
    let server = StubServer::start(vec![StubResponse::server_error()]).await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    let err = client
        .send_message("hi", None, DEFAULT_SESSION_ID)
        .await
        .expect_err("all attempts fail");

    match err {
        Error::Webhook(WebhookError::RetriesExhausted { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, WebhookError::Status { status: 500 }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn connectivity_probe_accepts_any_answer_below_500() {
    let server = StubServer::start(vec![StubResponse::new(404, "")]).await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    assert!(client.test_connection().await);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn connectivity_probe_fails_when_nothing_listens() {
    // Port 1 is never listening on a test machine
    let client = WebhookClient::new(webhook_config(
        "http://127.0.0.1:1/chat".into(),
        "http://127.0.0.1:1/ingest".into(),
    ));
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn ingest_parses_the_receipt() {
    let server = StubServer::start(vec![StubResponse::ok(
        r#"{"success":true,"message":"stored","details":{"chunksProcessed":4}}"#,
    )])
    .await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    let document = DocumentUpload {
        file_name: "syllabus.pdf".into(),
        mime: "application/pdf".into(),
        bytes: vec![1, 2, 3],
    };
    let receipt = client
        .ingest_document(document, &UserId::new("u1"), "u1@example.com", "rust-101")
        .await
        .expect("ingest succeeds");

    assert!(receipt.success);
    assert_eq!(receipt.message.as_deref(), Some("stored"));
    assert_eq!(receipt.details.map(|d| d.chunks_processed), Some(4));
}

#[tokio::test]
async fn ingest_does_not_retry_on_failure() {
    let server = StubServer::start(vec![StubResponse::server_error()]).await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    let document = DocumentUpload {
        file_name: "notes.txt".into(),
        mime: "text/plain".into(),
        bytes: vec![0; 8],
    };
    let err = client
        .ingest_document(document, &UserId::new("u1"), "", "course")
        .await
        .expect_err("upload fails");

    assert!(matches!(
        err,
        Error::Webhook(WebhookError::Status { status: 500 })
    ));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn ingest_rejects_unsupported_types_before_any_request() {
    let server = StubServer::start(vec![]).await;
    let client = WebhookClient::new(webhook_config(server.url("/chat"), server.url("/ingest")));

    let document = DocumentUpload {
        file_name: "tool.exe".into(),
        mime: "application/octet-stream".into(),
        bytes: vec![0; 8],
    };
    let err = client
        .ingest_document(document, &UserId::new("u1"), "", "course")
        .await
        .expect_err("validation fails");

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(server.hits(), 0);
}
