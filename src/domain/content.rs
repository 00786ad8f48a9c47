//! Course content tree: modules own topics, topics own lessons.
//!
//! Rows come back from the backing store as a nested select
//! (`modules` with embedded `topics` and `lessons`), so these types
//! double as the wire representation. Missing nested collections
//! deserialize as empty vectors rather than failing.

use serde::{Deserialize, Serialize};

use super::id::{LessonId, ModuleId, TopicId};

/// A course module, the top level of the content tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order_index: i32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// A topic within a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order_index: i32,
    #[serde(default)]
    pub is_published: bool,
    pub module_id: ModuleId,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A lesson within a topic, optionally backed by an external video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order_index: i32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub youtube_url: Option<String>,
    pub topic_id: TopicId,
}

/// Insert payload for a new module. `order_index` always appends.
#[derive(Debug, Clone, Serialize)]
pub struct NewModule {
    pub title: String,
    pub description: String,
    pub order_index: i32,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// Insert payload for a new topic.
#[derive(Debug, Clone, Serialize)]
pub struct NewTopic {
    pub title: String,
    pub description: String,
    pub module_id: ModuleId,
    pub order_index: i32,
    pub is_published: bool,
}

/// Insert payload for a new lesson.
#[derive(Debug, Clone, Serialize)]
pub struct NewLesson {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    pub topic_id: TopicId,
    pub order_index: i32,
    pub is_published: bool,
}

/// Partial update for an existing content row. Absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl Module {
    /// Total lessons across all topics.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.topics.iter().map(|t| t.lessons.len()).sum()
    }
}

impl ContentPatch {
    /// True when no field is set and applying the patch would be a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_published.is_none()
            && self.youtube_url.is_none()
            && self.cover_image_url.is_none()
    }
}

/// Sort a fetched tree by `order_index` at every level.
///
/// The store orders the top level; embedded children come back in
/// arbitrary order and are sorted here, the same way the classroom
/// view does it.
pub fn sort_tree(modules: &mut [Module]) {
    modules.sort_by_key(|m| m.order_index);
    for module in modules {
        module.topics.sort_by_key(|t| t.order_index);
        for topic in &mut module.topics {
            topic.lessons.sort_by_key(|l| l.order_index);
        }
    }
}

/// Extract the video ID from a YouTube watch or short URL.
#[must_use]
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let rest = url
        .split_once("youtube.com/watch?v=")
        .or_else(|| url.split_once("youtu.be/"))
        .map(|(_, rest)| rest)?;
    let id = rest.split(['&', '?', '#', '\n']).next()?;
    (!id.is_empty()).then_some(id)
}
