//! Store ports for the tables the application consumes.
//!
//! # Implementation Notes
//!
//! - Implementations must be thread-safe (`Send + Sync`)
//! - Authorization is enforced server-side by row-level policies;
//!   implementations pass the caller's identity through, nothing more.

use async_trait::async_trait;

use crate::domain::{
    ContentPatch, ForumComment, ForumPost, ForumPostLike, Lesson, LessonId, Module, ModuleId,
    NewComment, NewLesson, NewModule, NewPost, NewTopic, PostId, Topic, TopicId, UserId,
    UserProfile,
};
use crate::error::Result;

/// Operations on the course content tree (modules, topics, lessons).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the full tree with nested topics and lessons, ordered by
    /// `order_index` at every level. `published_only` filters modules
    /// the way the classroom view does.
    async fn fetch_modules(&self, published_only: bool) -> Result<Vec<Module>>;

    async fn insert_module(&self, new: &NewModule) -> Result<Module>;
    async fn insert_topic(&self, new: &NewTopic) -> Result<Topic>;
    async fn insert_lesson(&self, new: &NewLesson) -> Result<Lesson>;

    async fn update_module(&self, id: &ModuleId, patch: &ContentPatch) -> Result<()>;
    async fn update_topic(&self, id: &TopicId, patch: &ContentPatch) -> Result<()>;
    async fn update_lesson(&self, id: &LessonId, patch: &ContentPatch) -> Result<()>;
}

/// Operations on forum posts, comments, and likes.
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Posts ordered by creation time, newest first.
    async fn fetch_posts(&self) -> Result<Vec<ForumPost>>;

    /// All comments, oldest first. Per-post grouping happens in memory.
    async fn fetch_comments(&self) -> Result<Vec<ForumComment>>;

    /// All like rows. Counting and membership happen in memory.
    async fn fetch_likes(&self) -> Result<Vec<ForumPostLike>>;

    async fn insert_post(&self, new: &NewPost) -> Result<ForumPost>;
    async fn insert_comment(&self, new: &NewComment) -> Result<ForumComment>;
    async fn insert_like(&self, post: &PostId, user: &UserId) -> Result<()>;
    async fn delete_like(&self, post: &PostId, user: &UserId) -> Result<()>;
    async fn delete_post(&self, post: &PostId) -> Result<()>;
}

/// Operations on profiles, points, and lesson progress.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Profiles ordered by points descending, optionally limited.
    async fn fetch_profiles(&self, limit: Option<usize>) -> Result<Vec<UserProfile>>;

    /// The profile row for a single user, if one exists.
    async fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>>;

    /// Author of each forum post, one entry per post.
    async fn fetch_post_authors(&self) -> Result<Vec<UserId>>;

    /// Owner of each progress row, one entry per completed lesson.
    async fn fetch_progress_owners(&self) -> Result<Vec<UserId>>;

    /// Lessons the given user has completed.
    async fn fetch_completed_lessons(&self, user: &UserId) -> Result<Vec<LessonId>>;

    /// Record a completed lesson. Returns `false` when the lesson was
    /// already marked complete (duplicate insert).
    async fn insert_progress(&self, user: &UserId, lesson: &LessonId) -> Result<bool>;

    /// Award points through the store-side `update_user_points` routine.
    async fn add_points(&self, user: &UserId, points: i64) -> Result<()>;
}
