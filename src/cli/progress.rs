//! `aula progress` commands.

use std::sync::Arc;

use crate::cli::{output, CompleteArgs};
use crate::config::Config;
use crate::domain::{LessonId, UserId, LESSON_COMPLETION_POINTS};
use crate::error::Result;
use crate::service::{ContentService, ProgressService};
use crate::storage::StorageClient;
use crate::store::StoreClient;

fn service(config: &Config) -> ProgressService {
    ProgressService::new(Arc::new(StoreClient::new(&config.store)))
}

pub async fn complete(config: &Config, actor: &UserId, args: &CompleteArgs) -> Result<()> {
    let lesson = LessonId::new(&args.lesson_id);
    if service(config).mark_complete(actor, &lesson).await? {
        output::ok(&format!(
            "lesson complete, {LESSON_COMPLETION_POINTS} points awarded"
        ));
    } else {
        output::note("already completed, no points awarded");
    }
    Ok(())
}

pub async fn show(config: &Config, actor: &UserId) -> Result<()> {
    let store = Arc::new(StoreClient::new(&config.store));
    let content = ContentService::new(
        store.clone(),
        store,
        Arc::new(StorageClient::new(&config.store)),
        config.storage.cover_bucket.clone(),
        config.forum.max_image_bytes,
    );
    let modules = content.load_tree(true).await?;
    let progress = service(config).module_progress(actor, &modules).await?;

    output::section("Progress");
    let (mut done, mut total) = (0, 0);
    for row in &progress {
        done += row.completed;
        total += row.total;
        output::key_value(
            &row.module_title,
            format!("{}/{} ({}%)", row.completed, row.total, row.percent()),
        );
    }
    let overall = if total == 0 { 0 } else { done * 100 / total };
    output::key_value("overall", format!("{done}/{total} ({overall}%)"));
    Ok(())
}
