//! Content use cases: load the tree, project it, append new rows, and
//! patch existing ones.
//!
//! Writes are gated on the actor's role. The store's row-level
//! policies remain the actual authority; the gate mirrors them so the
//! caller gets a clear error without a round-trip that would be
//! rejected anyway.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    ContentPatch, ImageAttachment, Lesson, LessonId, Module, ModuleId, NewLesson, NewModule,
    NewTopic, Topic, TopicId, UserId,
};
use crate::error::{Result, ValidationError};
use crate::port::{CommunityStore, ContentStore, ObjectStore};
use crate::projector::{project, ContentGraph};
use crate::storage::object_path;

/// Content tree operations against an injected store.
pub struct ContentService {
    content: Arc<dyn ContentStore>,
    community: Arc<dyn CommunityStore>,
    objects: Arc<dyn ObjectStore>,
    cover_bucket: String,
    max_image_bytes: u64,
}

impl ContentService {
    pub fn new(
        content: Arc<dyn ContentStore>,
        community: Arc<dyn CommunityStore>,
        objects: Arc<dyn ObjectStore>,
        cover_bucket: impl Into<String>,
        max_image_bytes: u64,
    ) -> Self {
        Self {
            content,
            community,
            objects,
            cover_bucket: cover_bucket.into(),
            max_image_bytes,
        }
    }

    /// Users without a profile row default to the student role.
    async fn require_editor(&self, actor: &UserId) -> Result<()> {
        let role = self
            .community
            .fetch_profile(actor)
            .await?
            .map(|p| p.role)
            .unwrap_or_default();
        if role.can_edit_content() {
            Ok(())
        } else {
            Err(ValidationError::EditorRequired.into())
        }
    }

    /// The full tree, sorted at every level. `published_only` matches
    /// the classroom view; the editor passes `false` to see drafts.
    pub async fn load_tree(&self, published_only: bool) -> Result<Vec<Module>> {
        self.content.fetch_modules(published_only).await
    }

    /// Load the tree and project it into the visual graph.
    pub async fn load_graph(&self, published_only: bool) -> Result<ContentGraph> {
        let modules = self.load_tree(published_only).await?;
        Ok(project(&modules))
    }

    /// Append a module at the end of the tree.
    pub async fn create_module(
        &self,
        actor: &UserId,
        title: &str,
        description: &str,
    ) -> Result<Module> {
        self.require_editor(actor).await?;
        let modules = self.content.fetch_modules(false).await?;
        let new = NewModule {
            title: title.to_string(),
            description: description.to_string(),
            order_index: modules.len() as i32 + 1,
            is_published: false,
            cover_image_url: None,
        };
        let module = self.content.insert_module(&new).await?;
        info!(module_id = %module.id, "created module");
        Ok(module)
    }

    /// Append a topic at the end of its module.
    pub async fn create_topic(
        &self,
        actor: &UserId,
        module_id: &ModuleId,
        title: &str,
        description: &str,
    ) -> Result<Topic> {
        self.require_editor(actor).await?;
        let modules = self.content.fetch_modules(false).await?;
        let siblings = modules
            .iter()
            .find(|m| m.id == *module_id)
            .map(|m| m.topics.len())
            .ok_or_else(|| crate::error::Error::NotFound(format!("module {module_id}")))?;

        let new = NewTopic {
            title: title.to_string(),
            description: description.to_string(),
            module_id: module_id.clone(),
            order_index: siblings as i32 + 1,
            is_published: false,
        };
        let topic = self.content.insert_topic(&new).await?;
        info!(topic_id = %topic.id, "created topic");
        Ok(topic)
    }

    /// Append a lesson at the end of its topic.
    pub async fn create_lesson(
        &self,
        actor: &UserId,
        topic_id: &TopicId,
        title: &str,
        description: &str,
        youtube_url: Option<&str>,
    ) -> Result<Lesson> {
        self.require_editor(actor).await?;
        let modules = self.content.fetch_modules(false).await?;
        let siblings = modules
            .iter()
            .flat_map(|m| &m.topics)
            .find(|t| t.id == *topic_id)
            .map(|t| t.lessons.len())
            .ok_or_else(|| crate::error::Error::NotFound(format!("topic {topic_id}")))?;

        let new = NewLesson {
            title: title.to_string(),
            description: description.to_string(),
            youtube_url: youtube_url.map(String::from),
            topic_id: topic_id.clone(),
            order_index: siblings as i32 + 1,
            is_published: false,
        };
        let lesson = self.content.insert_lesson(&new).await?;
        info!(lesson_id = %lesson.id, "created lesson");
        Ok(lesson)
    }

    /// Patch a module row in place.
    pub async fn update_module(
        &self,
        actor: &UserId,
        id: &ModuleId,
        patch: &ContentPatch,
    ) -> Result<()> {
        self.require_editor(actor).await?;
        self.content.update_module(id, patch).await?;
        info!(module_id = %id, "updated module");
        Ok(())
    }

    /// Patch a topic row in place.
    pub async fn update_topic(
        &self,
        actor: &UserId,
        id: &TopicId,
        patch: &ContentPatch,
    ) -> Result<()> {
        self.require_editor(actor).await?;
        self.content.update_topic(id, patch).await?;
        info!(topic_id = %id, "updated topic");
        Ok(())
    }

    /// Patch a lesson row in place.
    pub async fn update_lesson(
        &self,
        actor: &UserId,
        id: &LessonId,
        patch: &ContentPatch,
    ) -> Result<()> {
        self.require_editor(actor).await?;
        self.content.update_lesson(id, patch).await?;
        info!(lesson_id = %id, "updated lesson");
        Ok(())
    }

    /// Upload a cover image and point the module at its public URL.
    pub async fn attach_cover(
        &self,
        module_id: &ModuleId,
        uploader: &UserId,
        image: ImageAttachment,
    ) -> Result<String> {
        self.require_editor(uploader).await?;
        image.validate(self.max_image_bytes)?;
        let path = object_path(uploader.as_str(), &image.file_name);
        self.objects
            .upload(&self.cover_bucket, &path, image.bytes, &image.mime)
            .await?;
        let url = self.objects.public_url(&self.cover_bucket, &path);

        let patch = ContentPatch {
            cover_image_url: Some(url.clone()),
            ..Default::default()
        };
        self.content.update_module(module_id, &patch).await?;
        info!(module_id = %module_id, "attached cover image");
        Ok(url)
    }
}
