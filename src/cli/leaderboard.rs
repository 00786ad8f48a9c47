//! `aula leaderboard` and `aula stats` commands.

use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::cli::{output, LeaderboardArgs};
use crate::config::Config;
use crate::error::Result;
use crate::service::LeaderboardService;
use crate::store::StoreClient;

#[derive(Tabled)]
struct LeaderboardRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Points")]
    points: i64,
    #[tabled(rename = "Posts")]
    posts: usize,
    #[tabled(rename = "Lessons")]
    lessons: usize,
}

fn service(config: &Config) -> LeaderboardService {
    LeaderboardService::new(Arc::new(StoreClient::new(&config.store)))
}

pub async fn show(config: &Config, args: &LeaderboardArgs) -> Result<()> {
    let entries = service(config).top(args.limit).await?;
    if entries.is_empty() {
        output::note("No members yet.");
        return Ok(());
    }

    let rows: Vec<LeaderboardRow> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardRow {
            rank: i + 1,
            name: entry.profile.display_name().to_string(),
            points: entry.profile.points,
            posts: entry.post_count,
            lessons: entry.progress_count,
        })
        .collect();

    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
    Ok(())
}

pub async fn stats(config: &Config) -> Result<()> {
    let stats = service(config).community_stats().await?;

    output::section("Community");
    output::key_value("members", stats.total_members);
    output::key_value("posts", stats.total_posts);
    output::key_value("lessons done", stats.completed_lessons);
    output::key_value("active this week", stats.active_this_week);
    Ok(())
}
