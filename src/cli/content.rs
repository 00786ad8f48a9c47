//! `aula content` commands: tree and graph views, row creation and
//! editing, covers.

use std::sync::Arc;

use crate::cli::{
    output, AddLessonArgs, AddModuleArgs, AddTopicArgs, ContentLevel, CoverArgs, EditArgs,
    PublishArgs, TreeArgs,
};
use crate::config::Config;
use crate::domain::{
    youtube_video_id, ContentPatch, ImageAttachment, LessonId, Module, ModuleId, TopicId, UserId,
};
use crate::error::{Result, ValidationError};
use crate::service::ContentService;
use crate::storage::StorageClient;
use crate::store::StoreClient;

fn service(config: &Config) -> ContentService {
    let store = Arc::new(StoreClient::new(&config.store));
    ContentService::new(
        store.clone(),
        store,
        Arc::new(StorageClient::new(&config.store)),
        config.storage.cover_bucket.clone(),
        config.forum.max_image_bytes,
    )
}

/// Print the content tree as indented text.
pub async fn tree(config: &Config, args: &TreeArgs) -> Result<()> {
    let modules = service(config).load_tree(!args.drafts).await?;
    if modules.is_empty() {
        output::note("No modules yet.");
        return Ok(());
    }
    print_tree(&modules);
    Ok(())
}

fn print_tree(modules: &[Module]) {
    for module in modules {
        let marker = if module.is_published { "" } else { " [draft]" };
        println!(
            "{} {}{marker} ({} lessons)",
            module.id,
            output::highlight(&module.title),
            module.lesson_count()
        );
        for topic in &module.topics {
            println!("  {} {}", topic.id, topic.title);
            for lesson in &topic.lessons {
                match lesson.youtube_url.as_deref().and_then(youtube_video_id) {
                    Some(video_id) => {
                        println!("    {} {} ▶ {video_id}", lesson.id, lesson.title);
                    }
                    None => println!("    {} {}", lesson.id, lesson.title),
                }
            }
        }
    }
}

/// Project the tree and print the graph as JSON.
pub async fn graph(config: &Config, args: &TreeArgs) -> Result<()> {
    let graph = service(config).load_graph(!args.drafts).await?;
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

pub async fn add_module(config: &Config, actor: &UserId, args: &AddModuleArgs) -> Result<()> {
    let module = service(config)
        .create_module(actor, &args.title, &args.description)
        .await?;
    output::ok(&format!("created module {}", module.id));
    Ok(())
}

pub async fn add_topic(config: &Config, actor: &UserId, args: &AddTopicArgs) -> Result<()> {
    let topic = service(config)
        .create_topic(
            actor,
            &ModuleId::new(&args.module_id),
            &args.title,
            &args.description,
        )
        .await?;
    output::ok(&format!("created topic {}", topic.id));
    Ok(())
}

pub async fn add_lesson(config: &Config, actor: &UserId, args: &AddLessonArgs) -> Result<()> {
    let lesson = service(config)
        .create_lesson(
            actor,
            &TopicId::new(&args.topic_id),
            &args.title,
            &args.description,
            args.video.as_deref(),
        )
        .await?;
    output::ok(&format!("created lesson {}", lesson.id));
    Ok(())
}

pub async fn edit(config: &Config, actor: &UserId, args: &EditArgs) -> Result<()> {
    if args.video.is_some() && args.level != ContentLevel::Lesson {
        return Err(ValidationError::VideoOutsideLesson.into());
    }
    let patch = ContentPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        youtube_url: args.video.clone(),
        ..Default::default()
    };
    if patch.is_empty() {
        output::note("Nothing to change.");
        return Ok(());
    }
    apply_patch(config, actor, args.level, &args.id, &patch).await?;
    output::ok(&format!("updated {}", args.id));
    Ok(())
}

pub async fn publish(config: &Config, actor: &UserId, args: &PublishArgs) -> Result<()> {
    let patch = ContentPatch {
        is_published: Some(!args.draft),
        ..Default::default()
    };
    apply_patch(config, actor, args.level, &args.id, &patch).await?;
    if args.draft {
        output::ok(&format!("{} moved back to draft", args.id));
    } else {
        output::ok(&format!("{} published", args.id));
    }
    Ok(())
}

async fn apply_patch(
    config: &Config,
    actor: &UserId,
    level: ContentLevel,
    id: &str,
    patch: &ContentPatch,
) -> Result<()> {
    let service = service(config);
    match level {
        ContentLevel::Module => service.update_module(actor, &ModuleId::new(id), patch).await,
        ContentLevel::Topic => service.update_topic(actor, &TopicId::new(id), patch).await,
        ContentLevel::Lesson => service.update_lesson(actor, &LessonId::new(id), patch).await,
    }
}

pub async fn cover(config: &Config, actor: &UserId, args: &CoverArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    let image = ImageAttachment {
        mime: super::forum::mime_for(&file_name),
        file_name,
        bytes,
    };

    let url = service(config)
        .attach_cover(&ModuleId::new(&args.module_id), actor, image)
        .await?;
    output::ok("cover uploaded");
    output::key_value("public url", url);
    Ok(())
}
