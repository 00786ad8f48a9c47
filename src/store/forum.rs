//! Forum table operations against the hosted store.

use async_trait::async_trait;

use super::client::StoreClient;
use crate::domain::{
    ForumComment, ForumPost, ForumPostLike, NewComment, NewPost, PostId, UserId,
};
use crate::error::Result;
use crate::port::ForumStore;

#[async_trait]
impl ForumStore for StoreClient {
    async fn fetch_posts(&self) -> Result<Vec<ForumPost>> {
        self.select(
            "forum_posts",
            &[("select", "*"), ("order", "created_at.desc")],
        )
        .await
    }

    async fn fetch_comments(&self) -> Result<Vec<ForumComment>> {
        self.select(
            "forum_comments",
            &[("select", "*"), ("order", "created_at.asc")],
        )
        .await
    }

    async fn fetch_likes(&self) -> Result<Vec<ForumPostLike>> {
        self.select("forum_post_likes", &[("select", "post_id,user_id")])
            .await
    }

    async fn insert_post(&self, new: &NewPost) -> Result<ForumPost> {
        self.insert("forum_posts", new).await
    }

    async fn insert_comment(&self, new: &NewComment) -> Result<ForumComment> {
        self.insert("forum_comments", new).await
    }

    async fn insert_like(&self, post: &PostId, user: &UserId) -> Result<()> {
        self.insert_only("forum_post_likes", &ForumPostLike {
            post_id: post.clone(),
            user_id: user.clone(),
        })
        .await
    }

    async fn delete_like(&self, post: &PostId, user: &UserId) -> Result<()> {
        let post_filter = format!("eq.{post}");
        let user_filter = format!("eq.{user}");
        self.delete(
            "forum_post_likes",
            &[
                ("post_id", post_filter.as_str()),
                ("user_id", user_filter.as_str()),
            ],
        )
        .await
    }

    async fn delete_post(&self, post: &PostId) -> Result<()> {
        let id_filter = format!("eq.{post}");
        self.delete("forum_posts", &[("id", id_filter.as_str())])
            .await
    }
}
