//! Leaderboard and community-wide statistics.
//!
//! Rankings come straight from the store's points ordering; the per-user
//! activity counts are joined in memory from flat author/owner lists.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{CommunityStats, LeaderboardEntry, UserId};
use crate::error::Result;
use crate::port::CommunityStore;

/// Default number of leaderboard rows.
pub const DEFAULT_TOP: usize = 50;

pub struct LeaderboardService {
    community: Arc<dyn CommunityStore>,
}

impl LeaderboardService {
    pub fn new(community: Arc<dyn CommunityStore>) -> Self {
        Self { community }
    }

    /// Top profiles by points with their post and completion counts.
    pub async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let (profiles, authors, owners) = tokio::try_join!(
            self.community.fetch_profiles(Some(limit)),
            self.community.fetch_post_authors(),
            self.community.fetch_progress_owners(),
        )?;

        let post_counts = count_by_user(&authors);
        let progress_counts = count_by_user(&owners);

        Ok(profiles
            .into_iter()
            .map(|profile| LeaderboardEntry {
                post_count: post_counts.get(&profile.id).copied().unwrap_or(0),
                progress_count: progress_counts.get(&profile.id).copied().unwrap_or(0),
                profile,
            })
            .collect())
    }

    /// Community totals shown on the members page.
    ///
    /// "Active this week" is approximated as 60% of the member count
    /// until real activity tracking exists.
    pub async fn community_stats(&self) -> Result<CommunityStats> {
        let (profiles, authors, owners) = tokio::try_join!(
            self.community.fetch_profiles(None),
            self.community.fetch_post_authors(),
            self.community.fetch_progress_owners(),
        )?;

        let total_members = profiles.len();
        Ok(CommunityStats {
            total_members,
            total_posts: authors.len(),
            completed_lessons: owners.len(),
            active_this_week: total_members * 60 / 100,
        })
    }
}

fn count_by_user(ids: &[UserId]) -> HashMap<&UserId, usize> {
    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_group_repeated_users() {
        let ids = vec![UserId::new("a"), UserId::new("b"), UserId::new("a")];
        let counts = count_by_user(&ids);
        assert_eq!(counts.get(&UserId::new("a")), Some(&2));
        assert_eq!(counts.get(&UserId::new("b")), Some(&1));
    }
}
