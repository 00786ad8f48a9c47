//! Forum use cases: assemble the feed, create posts with optional
//! image attachments, comment, and toggle likes.
//!
//! The store exposes flat tables; author names, comment grouping, and
//! like counts are joined here in memory, keeping the store surface to
//! plain selects.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    validate_comment, ForumComment, ForumPost, ImageAttachment, NewComment, PostCategory,
    PostDraft, PostId, UserId, UserProfile,
};
use crate::error::Result;
use crate::port::{CommunityStore, ForumStore, ObjectStore};
use crate::storage::object_path;

/// A post joined with everything the feed shows for it.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: ForumPost,
    pub author_name: String,
    pub author_points: i64,
    pub comments: Vec<ForumComment>,
    pub like_count: usize,
    pub liked_by_viewer: bool,
}

impl PostView {
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// The assembled feed, newest post first.
#[derive(Debug, Clone, Default)]
pub struct ForumFeed {
    pub posts: Vec<PostView>,
}

impl ForumFeed {
    /// Posts matching a category and a case-insensitive text query.
    /// `None` means "no filter" for either dimension.
    #[must_use]
    pub fn filtered(
        &self,
        category: Option<PostCategory>,
        search: Option<&str>,
    ) -> Vec<&PostView> {
        let needle = search.map(str::to_lowercase);
        self.posts
            .iter()
            .filter(|view| category.map_or(true, |c| view.post.category == c))
            .filter(|view| {
                needle.as_deref().map_or(true, |q| {
                    view.post.title.to_lowercase().contains(q)
                        || view.post.content.to_lowercase().contains(q)
                })
            })
            .collect()
    }
}

/// Forum operations against injected store and storage ports.
pub struct ForumService {
    forum: Arc<dyn ForumStore>,
    community: Arc<dyn CommunityStore>,
    objects: Arc<dyn ObjectStore>,
    image_bucket: String,
    max_image_bytes: u64,
}

impl ForumService {
    pub fn new(
        forum: Arc<dyn ForumStore>,
        community: Arc<dyn CommunityStore>,
        objects: Arc<dyn ObjectStore>,
        image_bucket: impl Into<String>,
        max_image_bytes: u64,
    ) -> Self {
        Self {
            forum,
            community,
            objects,
            image_bucket: image_bucket.into(),
            max_image_bytes,
        }
    }

    /// Fetch posts, comments, likes, and profiles concurrently and join
    /// them into the feed. The viewer determines `liked_by_viewer`.
    pub async fn fetch_feed(&self, viewer: Option<&UserId>) -> Result<ForumFeed> {
        let (posts, comments, likes, profiles) = tokio::try_join!(
            self.forum.fetch_posts(),
            self.forum.fetch_comments(),
            self.forum.fetch_likes(),
            self.community.fetch_profiles(None),
        )?;
        debug!(
            posts = posts.len(),
            comments = comments.len(),
            likes = likes.len(),
            "assembling forum feed"
        );

        let profiles: HashMap<&UserId, &UserProfile> =
            profiles.iter().map(|p| (&p.id, p)).collect();

        let mut comments_by_post: HashMap<PostId, Vec<ForumComment>> = HashMap::new();
        for comment in comments {
            comments_by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(comment);
        }

        let mut like_counts: HashMap<&PostId, usize> = HashMap::new();
        for like in &likes {
            *like_counts.entry(&like.post_id).or_default() += 1;
        }

        let views = posts
            .into_iter()
            .map(|post| {
                let author = profiles.get(&post.user_id);
                let liked_by_viewer = viewer
                    .map(|v| likes.iter().any(|l| l.post_id == post.id && l.user_id == *v))
                    .unwrap_or(false);
                PostView {
                    author_name: author
                        .map(|p| p.display_name().to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    author_points: author.map(|p| p.points).unwrap_or(0),
                    comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                    like_count: like_counts.get(&post.id).copied().unwrap_or(0),
                    liked_by_viewer,
                    post,
                }
            })
            .collect();

        Ok(ForumFeed { posts: views })
    }

    /// Validate and publish a post, uploading the attachment first when
    /// one is given. Nothing reaches the store or storage until both
    /// the draft and the attachment pass validation.
    pub async fn create_post(
        &self,
        draft: PostDraft,
        author: &UserId,
        image: Option<ImageAttachment>,
    ) -> Result<ForumPost> {
        let mut new_post = draft.into_new_post(author)?;

        if let Some(image) = image {
            image.validate(self.max_image_bytes)?;
            let path = object_path(author.as_str(), &image.file_name);
            self.objects
                .upload(&self.image_bucket, &path, image.bytes, &image.mime)
                .await?;
            new_post.image_url = Some(self.objects.public_url(&self.image_bucket, &path));
        }

        let post = self.forum.insert_post(&new_post).await?;
        info!(post_id = %post.id, "published forum post");
        Ok(post)
    }

    /// Add a comment to a post. Returns the stored comment.
    pub async fn add_comment(
        &self,
        post: &PostId,
        author: &UserId,
        content: &str,
    ) -> Result<ForumComment> {
        let content = validate_comment(content)?;
        let new = NewComment {
            content: content.to_string(),
            post_id: post.clone(),
            user_id: author.clone(),
        };
        self.forum.insert_comment(&new).await
    }

    /// Toggle the viewer's like on a post. Returns the new liked state.
    pub async fn toggle_like(&self, post: &PostId, viewer: &UserId) -> Result<bool> {
        let likes = self.forum.fetch_likes().await?;
        let already = likes
            .iter()
            .any(|l| l.post_id == *post && l.user_id == *viewer);

        if already {
            self.forum.delete_like(post, viewer).await?;
            Ok(false)
        } else {
            self.forum.insert_like(post, viewer).await?;
            Ok(true)
        }
    }

    /// Delete a post. The store cascades comments and likes.
    pub async fn delete_post(&self, post: &PostId) -> Result<()> {
        self.forum.delete_post(post).await?;
        info!(post_id = %post, "deleted forum post");
        Ok(())
    }
}
