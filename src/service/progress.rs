//! Lesson completion and per-user progress.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::domain::{LessonId, Module, UserId, LESSON_COMPLETION_POINTS};
use crate::error::Result;
use crate::port::CommunityStore;

/// Per-module completion summary for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProgress {
    pub module_title: String,
    pub completed: usize,
    pub total: usize,
}

impl ModuleProgress {
    /// Completion as a whole percentage; empty modules count as 0%.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (self.completed * 100 / self.total) as u32
        }
    }
}

/// Progress tracking against an injected community store.
pub struct ProgressService {
    community: Arc<dyn CommunityStore>,
}

impl ProgressService {
    pub fn new(community: Arc<dyn CommunityStore>) -> Self {
        Self { community }
    }

    /// Mark a lesson complete and award points on first completion.
    ///
    /// Returns `true` when this call recorded a new completion. Marking
    /// an already-completed lesson is a no-op and awards nothing, so
    /// points cannot be farmed by re-completing.
    pub async fn mark_complete(&self, user: &UserId, lesson: &LessonId) -> Result<bool> {
        let newly_completed = self.community.insert_progress(user, lesson).await?;
        if newly_completed {
            self.community
                .add_points(user, LESSON_COMPLETION_POINTS)
                .await?;
            info!(user_id = %user, lesson_id = %lesson, points = LESSON_COMPLETION_POINTS, "lesson completed");
        }
        Ok(newly_completed)
    }

    /// Lessons the user has completed, as a set for membership checks.
    pub async fn completed_set(&self, user: &UserId) -> Result<HashSet<LessonId>> {
        let lessons = self.community.fetch_completed_lessons(user).await?;
        Ok(lessons.into_iter().collect())
    }

    /// Per-module completion for the given tree.
    pub async fn module_progress(
        &self,
        user: &UserId,
        modules: &[Module],
    ) -> Result<Vec<ModuleProgress>> {
        let completed = self.completed_set(user).await?;
        Ok(modules
            .iter()
            .map(|module| {
                let lessons: Vec<&LessonId> = module
                    .topics
                    .iter()
                    .flat_map(|t| t.lessons.iter().map(|l| &l.id))
                    .collect();
                ModuleProgress {
                    module_title: module.title.clone(),
                    completed: lessons.iter().filter(|id| completed.contains(*id)).count(),
                    total: lessons.len(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down_and_handles_empty() {
        let p = ModuleProgress {
            module_title: "m".into(),
            completed: 2,
            total: 3,
        };
        assert_eq!(p.percent(), 66);

        let empty = ModuleProgress {
            module_title: "m".into(),
            completed: 0,
            total: 0,
        };
        assert_eq!(empty.percent(), 0);
    }
}
