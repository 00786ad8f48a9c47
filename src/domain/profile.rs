//! User profiles, roles, and community aggregates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Points awarded for completing a lesson.
pub const LESSON_COMPLETION_POINTS: i64 = 25;

/// Role of a user. Determines which admin actions are offered; the
/// store's row-level policies remain the actual authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    #[default]
    Student,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Whether this role may edit course content.
    #[must_use]
    pub const fn can_edit_content(&self) -> bool {
        matches!(self, Role::Admin | Role::Instructor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A profile row. Points grow monotonically through awarded actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Best available display name: full name, then email, then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("unknown")
    }
}

/// A leaderboard row: profile fields plus activity counts joined in memory.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub profile: UserProfile,
    pub post_count: usize,
    pub progress_count: usize,
}

/// Community-wide totals shown on the members page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityStats {
    pub total_members: usize,
    pub total_posts: usize,
    pub completed_lessons: usize,
    /// Approximation until real activity tracking exists: 60% of members.
    pub active_this_week: usize,
}
