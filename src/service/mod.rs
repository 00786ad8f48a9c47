//! Application services: the use-case layer between the CLI and the
//! store/storage/webhook clients. Services depend only on the port
//! traits so tests can swap in in-memory doubles.

mod content;
mod forum;
mod leaderboard;
mod progress;
mod tutor;

pub use content::ContentService;
pub use forum::{ForumFeed, ForumService, PostView};
pub use leaderboard::LeaderboardService;
pub use progress::ProgressService;
pub use tutor::{ChatTurn, TutorSession};
