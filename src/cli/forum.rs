//! `aula forum` commands.

use std::sync::Arc;

use crate::cli::{output, ForumCommentArgs, ForumLikeArgs, ForumListArgs, ForumPostArgs};
use crate::config::Config;
use crate::domain::{ImageAttachment, PostDraft, PostId, UserId};
use crate::error::Result;
use crate::service::ForumService;
use crate::storage::StorageClient;
use crate::store::StoreClient;

fn service(config: &Config) -> ForumService {
    let store = Arc::new(StoreClient::new(&config.store));
    ForumService::new(
        store.clone(),
        store,
        Arc::new(StorageClient::new(&config.store)),
        config.storage.forum_bucket.clone(),
        config.forum.max_image_bytes,
    )
}

/// Content type from a file name, for uploads where the shell gives us
/// only a path. Unknown extensions fall through to octet-stream, which
/// the validators then reject with a useful message.
#[must_use]
pub fn mime_for(file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
    .to_string()
}

pub async fn list(config: &Config, viewer: Option<&UserId>, args: &ForumListArgs) -> Result<()> {
    let feed = service(config).fetch_feed(viewer).await?;

    let posts = feed.filtered(args.category, args.search.as_deref());

    if posts.is_empty() {
        output::note("No posts match.");
        return Ok(());
    }

    for view in posts {
        let liked = if view.liked_by_viewer { " ♥" } else { "" };
        output::section(&format!("{} — {}", view.post.title, view.post.category));
        output::key_value("id", &view.post.id);
        output::key_value(
            "author",
            format!("{} ({} pts)", view.author_name, view.author_points),
        );
        output::key_value("posted", view.post.created_at.to_rfc3339());
        output::key_value(
            "likes/comments",
            format!("{}{liked} / {}", view.like_count, view.comment_count()),
        );
        if let Some(url) = &view.post.image_url {
            output::key_value("image", url);
        }
        println!();
        println!("{}", view.post.content);
        for comment in &view.comments {
            println!("  ↳ {}", comment.content);
        }
    }
    Ok(())
}

pub async fn post(config: &Config, actor: &UserId, args: &ForumPostArgs) -> Result<()> {
    let draft = PostDraft {
        title: args.title.clone(),
        content: args.content.clone(),
        category: args.category,
    };

    let image = match &args.image {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            Some(ImageAttachment {
                mime: mime_for(&file_name),
                file_name,
                bytes,
            })
        }
        None => None,
    };

    let post = service(config).create_post(draft, actor, image).await?;
    output::ok(&format!("published post {}", post.id));
    Ok(())
}

pub async fn comment(config: &Config, actor: &UserId, args: &ForumCommentArgs) -> Result<()> {
    let comment = service(config)
        .add_comment(&PostId::new(&args.post_id), actor, &args.content)
        .await?;
    output::ok(&format!("added comment {}", comment.id));
    Ok(())
}

pub async fn like(config: &Config, actor: &UserId, args: &ForumLikeArgs) -> Result<()> {
    let liked = service(config)
        .toggle_like(&PostId::new(&args.post_id), actor)
        .await?;
    if liked {
        output::ok("liked");
    } else {
        output::ok("unliked");
    }
    Ok(())
}

pub async fn delete(config: &Config, args: &ForumLikeArgs) -> Result<()> {
    service(config).delete_post(&PostId::new(&args.post_id)).await?;
    output::ok("post deleted");
    Ok(())
}
