//! In-memory implementations of the store and storage ports.
//!
//! [`InMemoryStore`] plays the role of the REST client for unit and
//! integration tests: it implements all three store traits over plain
//! vectors, mints sequential IDs on insert, and records the name of
//! every mutating call so tests can assert that nothing was written.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{
    sort_tree, ContentPatch, ForumComment, ForumPost, ForumPostLike, Lesson, LessonId, Module,
    ModuleId, NewComment, NewLesson, NewModule, NewPost, NewTopic, PostId, Topic, TopicId,
    UserId, UserProfile,
};
use crate::error::{Result, StoreError};
use crate::port::{CommunityStore, ContentStore, ForumStore, ObjectStore};

#[derive(Default)]
struct State {
    modules: Vec<Module>,
    posts: Vec<ForumPost>,
    comments: Vec<ForumComment>,
    likes: Vec<ForumPostLike>,
    profiles: Vec<UserProfile>,
    progress: Vec<(UserId, LessonId)>,
}

/// In-memory store implementing every store port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    next_id: AtomicU32,
    mutations: Mutex<Vec<&'static str>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modules(self, modules: Vec<Module>) -> Self {
        self.state.lock().modules = modules;
        self
    }

    pub fn with_posts(self, posts: Vec<ForumPost>) -> Self {
        self.state.lock().posts = posts;
        self
    }

    pub fn with_comments(self, comments: Vec<ForumComment>) -> Self {
        self.state.lock().comments = comments;
        self
    }

    pub fn with_likes(self, likes: Vec<ForumPostLike>) -> Self {
        self.state.lock().likes = likes;
        self
    }

    pub fn with_profiles(self, profiles: Vec<UserProfile>) -> Self {
        self.state.lock().profiles = profiles;
        self
    }

    pub fn with_progress(self, progress: Vec<(UserId, LessonId)>) -> Self {
        self.state.lock().progress = progress;
        self
    }

    /// Names of the mutating calls made so far, in order.
    pub fn mutations(&self) -> Vec<&'static str> {
        self.mutations.lock().clone()
    }

    /// Current like rows, for asserting toggle outcomes.
    pub fn likes(&self) -> Vec<ForumPostLike> {
        self.state.lock().likes.clone()
    }

    /// Current points for a user, summed from awards.
    pub fn points_of(&self, user: &UserId) -> i64 {
        self.state
            .lock()
            .profiles
            .iter()
            .find(|p| p.id == *user)
            .map(|p| p.points)
            .unwrap_or(0)
    }

    fn record(&self, name: &'static str) {
        self.mutations.lock().push(name);
    }

    fn mint(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n}")
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn fetch_modules(&self, published_only: bool) -> Result<Vec<Module>> {
        let mut modules: Vec<Module> = self
            .state
            .lock()
            .modules
            .iter()
            .filter(|m| !published_only || m.is_published)
            .cloned()
            .collect();
        sort_tree(&mut modules);
        Ok(modules)
    }

    async fn insert_module(&self, new: &NewModule) -> Result<Module> {
        self.record("insert_module");
        let module = Module {
            id: ModuleId::new(self.mint("m")),
            title: new.title.clone(),
            description: new.description.clone(),
            order_index: new.order_index,
            is_published: new.is_published,
            cover_image_url: new.cover_image_url.clone(),
            topics: Vec::new(),
        };
        self.state.lock().modules.push(module.clone());
        Ok(module)
    }

    async fn insert_topic(&self, new: &NewTopic) -> Result<Topic> {
        self.record("insert_topic");
        let topic = Topic {
            id: TopicId::new(self.mint("t")),
            title: new.title.clone(),
            description: new.description.clone(),
            order_index: new.order_index,
            is_published: new.is_published,
            module_id: new.module_id.clone(),
            lessons: Vec::new(),
        };
        let mut state = self.state.lock();
        if let Some(module) = state.modules.iter_mut().find(|m| m.id == new.module_id) {
            module.topics.push(topic.clone());
        }
        Ok(topic)
    }

    async fn insert_lesson(&self, new: &NewLesson) -> Result<Lesson> {
        self.record("insert_lesson");
        let lesson = Lesson {
            id: LessonId::new(self.mint("l")),
            title: new.title.clone(),
            description: new.description.clone(),
            order_index: new.order_index,
            is_published: new.is_published,
            youtube_url: new.youtube_url.clone(),
            topic_id: new.topic_id.clone(),
        };
        let mut state = self.state.lock();
        for module in &mut state.modules {
            if let Some(topic) = module.topics.iter_mut().find(|t| t.id == new.topic_id) {
                topic.lessons.push(lesson.clone());
            }
        }
        Ok(lesson)
    }

    async fn update_module(&self, id: &ModuleId, patch: &ContentPatch) -> Result<()> {
        self.record("update_module");
        let mut state = self.state.lock();
        if let Some(module) = state.modules.iter_mut().find(|m| m.id == *id) {
            if let Some(title) = &patch.title {
                module.title = title.clone();
            }
            if let Some(description) = &patch.description {
                module.description = description.clone();
            }
            if let Some(published) = patch.is_published {
                module.is_published = published;
            }
            if let Some(url) = &patch.cover_image_url {
                module.cover_image_url = Some(url.clone());
            }
        }
        Ok(())
    }

    async fn update_topic(&self, id: &TopicId, patch: &ContentPatch) -> Result<()> {
        self.record("update_topic");
        let mut state = self.state.lock();
        for module in &mut state.modules {
            if let Some(topic) = module.topics.iter_mut().find(|t| t.id == *id) {
                if let Some(title) = &patch.title {
                    topic.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    topic.description = description.clone();
                }
                if let Some(published) = patch.is_published {
                    topic.is_published = published;
                }
            }
        }
        Ok(())
    }

    async fn update_lesson(&self, id: &LessonId, patch: &ContentPatch) -> Result<()> {
        self.record("update_lesson");
        let mut state = self.state.lock();
        for module in &mut state.modules {
            for topic in &mut module.topics {
                if let Some(lesson) = topic.lessons.iter_mut().find(|l| l.id == *id) {
                    if let Some(title) = &patch.title {
                        lesson.title = title.clone();
                    }
                    if let Some(description) = &patch.description {
                        lesson.description = description.clone();
                    }
                    if let Some(published) = patch.is_published {
                        lesson.is_published = published;
                    }
                    if let Some(url) = &patch.youtube_url {
                        lesson.youtube_url = Some(url.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ForumStore for InMemoryStore {
    async fn fetch_posts(&self) -> Result<Vec<ForumPost>> {
        let mut posts = self.state.lock().posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn fetch_comments(&self) -> Result<Vec<ForumComment>> {
        let mut comments = self.state.lock().comments.clone();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn fetch_likes(&self) -> Result<Vec<ForumPostLike>> {
        Ok(self.state.lock().likes.clone())
    }

    async fn insert_post(&self, new: &NewPost) -> Result<ForumPost> {
        self.record("insert_post");
        let post = ForumPost {
            id: PostId::new(self.mint("p")),
            title: new.title.clone(),
            content: new.content.clone(),
            category: new.category,
            image_url: new.image_url.clone(),
            created_at: Utc::now(),
            user_id: new.user_id.clone(),
        };
        self.state.lock().posts.push(post.clone());
        Ok(post)
    }

    async fn insert_comment(&self, new: &NewComment) -> Result<ForumComment> {
        self.record("insert_comment");
        let comment = ForumComment {
            id: self.mint("c").into(),
            content: new.content.clone(),
            created_at: Utc::now(),
            post_id: new.post_id.clone(),
            user_id: new.user_id.clone(),
        };
        self.state.lock().comments.push(comment.clone());
        Ok(comment)
    }

    async fn insert_like(&self, post: &PostId, user: &UserId) -> Result<()> {
        self.record("insert_like");
        let mut state = self.state.lock();
        let row = ForumPostLike {
            post_id: post.clone(),
            user_id: user.clone(),
        };
        // The real table has a unique (post_id, user_id) constraint
        if state.likes.contains(&row) {
            return Err(StoreError::DuplicateKey {
                message: "like already exists".into(),
            }
            .into());
        }
        state.likes.push(row);
        Ok(())
    }

    async fn delete_like(&self, post: &PostId, user: &UserId) -> Result<()> {
        self.record("delete_like");
        self.state
            .lock()
            .likes
            .retain(|l| !(l.post_id == *post && l.user_id == *user));
        Ok(())
    }

    async fn delete_post(&self, post: &PostId) -> Result<()> {
        self.record("delete_post");
        let mut state = self.state.lock();
        state.posts.retain(|p| p.id != *post);
        state.comments.retain(|c| c.post_id != *post);
        state.likes.retain(|l| l.post_id != *post);
        Ok(())
    }
}

#[async_trait]
impl CommunityStore for InMemoryStore {
    async fn fetch_profiles(&self, limit: Option<usize>) -> Result<Vec<UserProfile>> {
        let mut profiles = self.state.lock().profiles.clone();
        profiles.sort_by(|a, b| b.points.cmp(&a.points));
        if let Some(limit) = limit {
            profiles.truncate(limit);
        }
        Ok(profiles)
    }

    async fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>> {
        Ok(self
            .state
            .lock()
            .profiles
            .iter()
            .find(|p| p.id == *user)
            .cloned())
    }

    async fn fetch_post_authors(&self) -> Result<Vec<UserId>> {
        Ok(self.state.lock().posts.iter().map(|p| p.user_id.clone()).collect())
    }

    async fn fetch_progress_owners(&self) -> Result<Vec<UserId>> {
        Ok(self.state.lock().progress.iter().map(|(u, _)| u.clone()).collect())
    }

    async fn fetch_completed_lessons(&self, user: &UserId) -> Result<Vec<LessonId>> {
        Ok(self
            .state
            .lock()
            .progress
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn insert_progress(&self, user: &UserId, lesson: &LessonId) -> Result<bool> {
        self.record("insert_progress");
        let mut state = self.state.lock();
        if state.progress.iter().any(|(u, l)| u == user && l == lesson) {
            return Ok(false);
        }
        state.progress.push((user.clone(), lesson.clone()));
        Ok(true)
    }

    async fn add_points(&self, user: &UserId, points: i64) -> Result<()> {
        self.record("add_points");
        let mut state = self.state.lock();
        if let Some(profile) = state.profiles.iter_mut().find(|p| p.id == *user) {
            profile.points += points;
        }
        Ok(())
    }
}

/// One recorded object upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub bucket: String,
    pub path: String,
    pub content_type: String,
    pub byte_len: usize,
}

/// Object storage double that records uploads instead of sending them.
#[derive(Default)]
pub struct RecordingObjectStore {
    uploads: Mutex<Vec<UploadRecord>>,
    removals: Mutex<Vec<String>>,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().clone()
    }

    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.uploads.lock().push(UploadRecord {
            bucket: bucket.to_string(),
            path: path.to_string(),
            content_type: content_type.to_string(),
            byte_len: bytes.len(),
        });
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        self.removals.lock().push(format!("{bucket}/{path}"));
        Ok(())
    }
}
