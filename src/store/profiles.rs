//! Profile, points, and progress operations against the hosted store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::StoreClient;
use crate::domain::{LessonId, UserId, UserProfile};
use crate::error::{Error, Result, StoreError};
use crate::port::CommunityStore;

#[derive(Debug, Deserialize)]
struct UserIdRow {
    user_id: UserId,
}

#[derive(Debug, Deserialize)]
struct LessonIdRow {
    lesson_id: LessonId,
}

#[derive(Debug, Serialize)]
struct NewProgress<'a> {
    user_id: &'a UserId,
    lesson_id: &'a LessonId,
}

#[derive(Debug, Serialize)]
struct UpdatePointsArgs<'a> {
    user_uuid: &'a UserId,
    points_to_add: i64,
}

#[async_trait]
impl CommunityStore for StoreClient {
    async fn fetch_profiles(&self, limit: Option<usize>) -> Result<Vec<UserProfile>> {
        let mut query = vec![("select", "*"), ("order", "points.desc")];
        let limit_value;
        if let Some(limit) = limit {
            limit_value = limit.to_string();
            query.push(("limit", limit_value.as_str()));
        }
        self.select("profiles", &query).await
    }

    async fn fetch_profile(&self, user: &UserId) -> Result<Option<UserProfile>> {
        let user_filter = format!("eq.{user}");
        let rows: Vec<UserProfile> = self
            .select(
                "profiles",
                &[
                    ("select", "*"),
                    ("id", user_filter.as_str()),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_post_authors(&self) -> Result<Vec<UserId>> {
        let rows: Vec<UserIdRow> = self
            .select("forum_posts", &[("select", "user_id")])
            .await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    async fn fetch_progress_owners(&self) -> Result<Vec<UserId>> {
        let rows: Vec<UserIdRow> = self
            .select("user_progress", &[("select", "user_id")])
            .await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    async fn fetch_completed_lessons(&self, user: &UserId) -> Result<Vec<LessonId>> {
        let user_filter = format!("eq.{user}");
        let rows: Vec<LessonIdRow> = self
            .select(
                "user_progress",
                &[("select", "lesson_id"), ("user_id", user_filter.as_str())],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.lesson_id).collect())
    }

    async fn insert_progress(&self, user: &UserId, lesson: &LessonId) -> Result<bool> {
        let result = self
            .insert_only(
                "user_progress",
                &NewProgress {
                    user_id: user,
                    lesson_id: lesson,
                },
            )
            .await;
        match result {
            Ok(()) => Ok(true),
            // Lesson already marked complete
            Err(Error::Store(StoreError::DuplicateKey { .. })) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn add_points(&self, user: &UserId, points: i64) -> Result<()> {
        self.rpc(
            "update_user_points",
            &UpdatePointsArgs {
                user_uuid: user,
                points_to_add: points,
            },
        )
        .await
    }
}
