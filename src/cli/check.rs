//! `aula check` diagnostics: configuration, store, and webhook probes.

use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::domain::{PostCategory, PostDraft, PostId, UserId};
use crate::error::Result;
use crate::port::{ForumStore, ObjectStore};
use crate::storage::StorageClient;
use crate::store::StoreClient;
use crate::webhook::WebhookClient;

/// Validate the configuration file without touching the network.
pub fn config(path: &Path) -> Result<()> {
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;
    output::ok("configuration file is valid");
    println!();
    output::note("Summary:");
    output::key_value("  store url", &config.store.url);
    output::key_value("  forum bucket", &config.storage.forum_bucket);
    output::key_value("  cover bucket", &config.storage.cover_bucket);
    output::key_value("  chat webhook", &config.webhook.chat_url);
    output::key_value("  ingest webhook", &config.webhook.ingest_url);
    output::key_value("  max retries", config.webhook.max_retries);
    println!();

    if config.store.service_key.is_some() {
        output::ok("service key found (from AULA_SERVICE_KEY env var)");
    } else {
        output::warn("no service key configured, using the anon key");
        output::note("  set AULA_SERVICE_KEY for admin operations");
    }

    match &config.actor.user_id {
        Some(id) => output::ok(&format!("acting as user {id}")),
        None => {
            output::warn("no [actor] configured");
            output::note("  read-only commands work; writes need --as or [actor]");
        }
    }

    println!();
    output::note("Configuration is ready to use.");
    Ok(())
}

/// Probe the backing store with a minimal select per table.
pub async fn store(config: &Config) -> Result<()> {
    let client = StoreClient::new(&config.store);

    for table in ["modules", "forum_posts", "profiles"] {
        output::progress(&format!("select {table}"));
        match client
            .select::<serde_json::Value>(table, &[("select", "id"), ("limit", "1")])
            .await
        {
            Ok(_) => output::progress_done(true),
            Err(e) => {
                output::progress_done(false);
                output::error(&format!("{e}"));
            }
        }
    }
    Ok(())
}

/// Round-trip a marker object through the forum bucket.
pub async fn storage(config: &Config) -> Result<()> {
    let client = StorageClient::new(&config.store);
    let bucket = &config.storage.forum_bucket;
    let path = format!("diagnostics/{}.txt", uuid::Uuid::new_v4());

    output::progress(&format!("upload to {bucket}"));
    match client
        .upload(bucket, &path, b"aula storage probe".to_vec(), "text/plain")
        .await
    {
        Ok(()) => output::progress_done(true),
        Err(e) => {
            output::progress_done(false);
            output::error(&format!("{e}"));
            return Ok(());
        }
    }

    output::progress("remove marker object");
    match client.remove(bucket, &path).await {
        Ok(()) => output::progress_done(true),
        Err(e) => {
            output::progress_done(false);
            output::warn(&format!("marker left behind at {path}: {e}"));
        }
    }
    Ok(())
}

/// Insert and delete a marker post to exercise the row-level policies.
pub async fn rls(config: &Config, actor: &UserId) -> Result<()> {
    let client = StoreClient::new(&config.store);

    let draft = PostDraft {
        title: "Diagnostics marker".into(),
        content: "Temporary post verifying write policies.".into(),
        category: PostCategory::General,
    };
    let new = draft.into_new_post(actor)?;

    output::progress("insert marker post");
    let post_id: PostId = match client.insert_post(&new).await {
        Ok(post) => {
            output::progress_done(true);
            post.id
        }
        Err(e) => {
            output::progress_done(false);
            output::error(&format!("write policy rejected the insert: {e}"));
            return Ok(());
        }
    };

    output::progress("delete marker post");
    match client.delete_post(&post_id).await {
        Ok(()) => output::progress_done(true),
        Err(e) => {
            output::progress_done(false);
            output::warn(&format!("marker post {post_id} left behind: {e}"));
        }
    }
    Ok(())
}

/// Probe the tutor webhook without sending a message.
pub async fn webhook(config: &Config) -> Result<()> {
    let client = WebhookClient::new(config.webhook.clone());
    output::progress("HEAD chat webhook");
    let reachable = client.test_connection().await;
    output::progress_done(reachable);
    if !reachable {
        output::note("  the webhook host did not answer; check the URL and the workflow");
    }
    Ok(())
}

/// Dump raw forum table counts, for debugging feed assembly.
pub async fn forum(config: &Config) -> Result<()> {
    let client = StoreClient::new(&config.store);

    let posts: Vec<serde_json::Value> = client
        .select("forum_posts", &[("select", "id,user_id,category")])
        .await?;
    let comments: Vec<serde_json::Value> = client
        .select("forum_comments", &[("select", "id,post_id")])
        .await?;
    let likes: Vec<serde_json::Value> = client
        .select("forum_post_likes", &[("select", "post_id,user_id")])
        .await?;
    let profiles: Vec<serde_json::Value> =
        client.select("profiles", &[("select", "id")]).await?;

    output::section("Forum tables");
    output::key_value("posts", posts.len());
    output::key_value("comments", comments.len());
    output::key_value("likes", likes.len());
    output::key_value("profiles", profiles.len());

    // Orphaned rows are the usual cause of a feed/table mismatch
    let post_ids: Vec<&str> = posts.iter().filter_map(|p| p["id"].as_str()).collect();
    let orphaned = comments
        .iter()
        .filter_map(|c| c["post_id"].as_str())
        .filter(|id| !post_ids.contains(id))
        .count();
    if orphaned > 0 {
        output::warn(&format!("{orphaned} comments reference missing posts"));
    } else {
        output::ok("every comment references an existing post");
    }
    Ok(())
}
