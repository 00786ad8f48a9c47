//! Command-line interface definitions.

pub mod check;
pub mod content;
pub mod forum;
pub mod ingest;
pub mod leaderboard;
pub mod output;
pub mod progress;
pub mod tutor;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::domain::{PostCategory, UserId};
use crate::error::{Result, ValidationError};

/// Aula - course content, community forum, and virtual tutor client.
#[derive(Parser, Debug)]
#[command(name = "aula")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "aula.toml")]
    pub config: PathBuf,

    /// Act as this user ID, overriding the [actor] config section
    #[arg(long, global = true, value_name = "USER_ID")]
    pub r#as: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and edit the course content tree
    #[command(subcommand)]
    Content(ContentCommand),

    /// Read and write the community forum
    #[command(subcommand)]
    Forum(ForumCommand),

    /// Track lesson completion
    #[command(subcommand)]
    Progress(ProgressCommand),

    /// Show the points leaderboard
    Leaderboard(LeaderboardArgs),

    /// Show community-wide statistics
    Stats,

    /// Chat with the virtual tutor
    Tutor(TutorArgs),

    /// Upload a document to the tutor's knowledge base
    Ingest(IngestArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `aula content`
#[derive(Subcommand, Debug)]
pub enum ContentCommand {
    /// Print the module → topic → lesson tree
    Tree(TreeArgs),
    /// Project the tree into the visual graph and print it as JSON
    Graph(TreeArgs),
    /// Append a new module
    AddModule(AddModuleArgs),
    /// Append a new topic to a module
    AddTopic(AddTopicArgs),
    /// Append a new lesson to a topic
    AddLesson(AddLessonArgs),
    /// Update fields of an existing row by ID
    Edit(EditArgs),
    /// Publish a row, or move it back to draft
    Publish(PublishArgs),
    /// Upload a cover image for a module
    Cover(CoverArgs),
}

/// Which level of the content tree a row lives at.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentLevel {
    Module,
    Topic,
    Lesson,
}

/// Subcommands for `aula forum`
#[derive(Subcommand, Debug)]
pub enum ForumCommand {
    /// List posts, newest first
    List(ForumListArgs),
    /// Publish a new post
    Post(ForumPostArgs),
    /// Comment on a post
    Comment(ForumCommentArgs),
    /// Toggle your like on a post
    Like(ForumLikeArgs),
    /// Delete one of your posts
    Delete(ForumLikeArgs),
}

/// Subcommands for `aula progress`
#[derive(Subcommand, Debug)]
pub enum ProgressCommand {
    /// Mark a lesson complete
    Complete(CompleteArgs),
    /// Show per-module completion
    Show,
}

/// Subcommands for `aula check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config,
    /// Probe the backing store
    Store,
    /// Round-trip a marker object through the forum bucket
    Storage,
    /// Insert and delete a marker post to exercise write policies
    Rls,
    /// Probe the tutor webhook
    Webhook,
    /// Dump raw forum tables for debugging
    Forum,
}

#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Include unpublished modules (editor view)
    #[arg(long)]
    pub drafts: bool,
}

#[derive(Parser, Debug)]
pub struct AddModuleArgs {
    /// Module title
    pub title: String,

    /// Module description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Parser, Debug)]
pub struct AddTopicArgs {
    /// Parent module ID
    pub module_id: String,

    /// Topic title
    pub title: String,

    /// Topic description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Parser, Debug)]
pub struct AddLessonArgs {
    /// Parent topic ID
    pub topic_id: String,

    /// Lesson title
    pub title: String,

    /// Lesson description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// YouTube URL for the lesson video
    #[arg(long)]
    pub video: Option<String>,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Kind of row to edit
    #[arg(value_enum)]
    pub level: ContentLevel,

    /// Row ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New YouTube URL (lessons only)
    #[arg(long)]
    pub video: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PublishArgs {
    /// Kind of row to publish
    #[arg(value_enum)]
    pub level: ContentLevel,

    /// Row ID
    pub id: String,

    /// Move the row back to draft instead
    #[arg(long)]
    pub draft: bool,
}

#[derive(Parser, Debug)]
pub struct CoverArgs {
    /// Module ID to attach the cover to
    pub module_id: String,

    /// Path to the image file
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ForumListArgs {
    /// Only show posts in this category
    #[arg(long)]
    pub category: Option<PostCategory>,

    /// Case-insensitive search over titles and content
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ForumPostArgs {
    /// Post title
    pub title: String,

    /// Post content
    pub content: String,

    /// Post category
    #[arg(long, default_value = "general")]
    pub category: PostCategory,

    /// Path to an image attachment
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ForumCommentArgs {
    /// Post ID to comment on
    pub post_id: String,

    /// Comment text
    pub content: String,
}

#[derive(Parser, Debug)]
pub struct ForumLikeArgs {
    /// Post ID
    pub post_id: String,
}

#[derive(Parser, Debug)]
pub struct CompleteArgs {
    /// Lesson ID to mark complete
    pub lesson_id: String,
}

#[derive(Parser, Debug)]
pub struct LeaderboardArgs {
    /// Number of rows to show
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

#[derive(Parser, Debug)]
pub struct TutorArgs {
    /// Send a single message instead of starting an interactive session
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Path to the document
    pub file: PathBuf,

    /// Course the document belongs to
    #[arg(long, default_value = "general")]
    pub course: String,
}

/// Resolve the acting user from the `--as` flag or the `[actor]`
/// config section. Commands that write on behalf of a user need this;
/// read-only commands call it with `.ok()` instead.
pub fn resolve_actor(cli_override: Option<&str>, config: &Config) -> Result<UserId> {
    cli_override
        .map(String::from)
        .or_else(|| config.actor.user_id.clone())
        .map(UserId::from)
        .ok_or_else(|| ValidationError::MissingActor.into())
}
