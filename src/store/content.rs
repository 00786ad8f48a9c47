//! Content tree operations against the hosted store.

use async_trait::async_trait;

use super::client::StoreClient;
use crate::domain::{
    sort_tree, ContentPatch, Lesson, LessonId, Module, ModuleId, NewLesson, NewModule, NewTopic,
    Topic, TopicId,
};
use crate::error::Result;
use crate::port::ContentStore;

/// Nested select mirroring the editor's query: modules with embedded
/// topics and lessons in one round trip.
const TREE_SELECT: &str = "*,topics(*,lessons(*))";

#[async_trait]
impl ContentStore for StoreClient {
    async fn fetch_modules(&self, published_only: bool) -> Result<Vec<Module>> {
        let mut query = vec![("select", TREE_SELECT), ("order", "order_index")];
        if published_only {
            query.push(("is_published", "eq.true"));
        }
        let mut modules: Vec<Module> = self.select("modules", &query).await?;
        // Embedded children come back unordered
        sort_tree(&mut modules);
        Ok(modules)
    }

    async fn insert_module(&self, new: &NewModule) -> Result<Module> {
        self.insert("modules", new).await
    }

    async fn insert_topic(&self, new: &NewTopic) -> Result<Topic> {
        self.insert("topics", new).await
    }

    async fn insert_lesson(&self, new: &NewLesson) -> Result<Lesson> {
        self.insert("lessons", new).await
    }

    async fn update_module(&self, id: &ModuleId, patch: &ContentPatch) -> Result<()> {
        let id_filter = format!("eq.{id}");
        self.update("modules", &[("id", id_filter.as_str())], patch)
            .await
    }

    async fn update_topic(&self, id: &TopicId, patch: &ContentPatch) -> Result<()> {
        let id_filter = format!("eq.{id}");
        self.update("topics", &[("id", id_filter.as_str())], patch)
            .await
    }

    async fn update_lesson(&self, id: &LessonId, patch: &ContentPatch) -> Result<()> {
        let id_filter = format!("eq.{id}");
        self.update("lessons", &[("id", id_filter.as_str())], patch)
            .await
    }
}
