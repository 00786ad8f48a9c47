//! `aula ingest` command: push a document into the tutor's knowledge base.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{forum::mime_for, output, IngestArgs};
use crate::config::Config;
use crate::domain::UserId;
use crate::error::Result;
use crate::webhook::{DocumentUpload, WebhookClient};

pub async fn run(config: &Config, actor: &UserId, args: &IngestArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let document = DocumentUpload {
        mime: mime_for(&file_name),
        file_name: file_name.clone(),
        bytes,
    };
    // Fail fast before showing any progress
    document.validate()?;

    let email = config.actor.email.clone().unwrap_or_default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("uploading {file_name}"));

    let client = WebhookClient::new(config.webhook.clone());
    let result = client
        .ingest_document(document, actor, &email, &args.course)
        .await;
    spinner.finish_and_clear();

    let receipt = result?;
    if receipt.success {
        output::ok(&receipt.message.unwrap_or_else(|| "document ingested".into()));
        if let Some(details) = receipt.details {
            output::key_value("chunks", details.chunks_processed);
        }
    } else {
        output::warn(
            &receipt
                .message
                .unwrap_or_else(|| "ingestion reported failure".into()),
        );
    }
    Ok(())
}
