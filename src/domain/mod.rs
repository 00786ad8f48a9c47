//! Platform-agnostic domain types: the content tree, forum entities,
//! and user profiles.

pub mod content;
pub mod forum;
pub mod id;
pub mod profile;

pub use content::{
    sort_tree, youtube_video_id, ContentPatch, Lesson, Module, NewLesson, NewModule, NewTopic,
    Topic,
};
pub use forum::{
    validate_comment, ForumComment, ForumPost, ForumPostLike, ImageAttachment, NewComment,
    NewPost, PostCategory, PostDraft, CONTENT_MIN_CHARS, TITLE_MIN_CHARS,
};
pub use id::{CommentId, LessonId, ModuleId, PostId, TopicId, UserId};
pub use profile::{
    CommunityStats, LeaderboardEntry, Role, UserProfile, LESSON_COMPLETION_POINTS,
};
