use clap::Parser;

use aula::cli::{self, Cli, CheckCommand, Commands, ContentCommand, ForumCommand, ProgressCommand};
use aula::config::Config;
use aula::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // `check config` must work even when the config is broken
    if let Commands::Check(CheckCommand::Config) = &cli.command {
        if let Err(e) = cli::check::config(&cli.config) {
            cli::output::error(&format!("{e}"));
            std::process::exit(1);
        }
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    config.init_logging();

    if let Err(e) = dispatch(&cli, &config).await {
        cli::output::error(&format!("{e}"));
        std::process::exit(1);
    }
}

async fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    let actor_override = cli.r#as.as_deref();

    match &cli.command {
        Commands::Content(command) => match command {
            ContentCommand::Tree(args) => cli::content::tree(config, args).await,
            ContentCommand::Graph(args) => cli::content::graph(config, args).await,
            ContentCommand::AddModule(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::add_module(config, &actor, args).await
            }
            ContentCommand::AddTopic(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::add_topic(config, &actor, args).await
            }
            ContentCommand::AddLesson(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::add_lesson(config, &actor, args).await
            }
            ContentCommand::Edit(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::edit(config, &actor, args).await
            }
            ContentCommand::Publish(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::publish(config, &actor, args).await
            }
            ContentCommand::Cover(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::content::cover(config, &actor, args).await
            }
        },
        Commands::Forum(command) => match command {
            ForumCommand::List(args) => {
                let viewer = cli::resolve_actor(actor_override, config).ok();
                cli::forum::list(config, viewer.as_ref(), args).await
            }
            ForumCommand::Post(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::forum::post(config, &actor, args).await
            }
            ForumCommand::Comment(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::forum::comment(config, &actor, args).await
            }
            ForumCommand::Like(args) => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::forum::like(config, &actor, args).await
            }
            ForumCommand::Delete(args) => cli::forum::delete(config, args).await,
        },
        Commands::Progress(command) => {
            let actor = cli::resolve_actor(actor_override, config)?;
            match command {
                ProgressCommand::Complete(args) => {
                    cli::progress::complete(config, &actor, args).await
                }
                ProgressCommand::Show => cli::progress::show(config, &actor).await,
            }
        }
        Commands::Leaderboard(args) => cli::leaderboard::show(config, args).await,
        Commands::Stats => cli::leaderboard::stats(config).await,
        Commands::Tutor(args) => {
            let actor = cli::resolve_actor(actor_override, config).ok();
            cli::tutor::run(config, actor, args).await
        }
        Commands::Ingest(args) => {
            let actor = cli::resolve_actor(actor_override, config)?;
            cli::ingest::run(config, &actor, args).await
        }
        Commands::Check(command) => match command {
            CheckCommand::Config => cli::check::config(&cli.config),
            CheckCommand::Store => cli::check::store(config).await,
            CheckCommand::Storage => cli::check::storage(config).await,
            CheckCommand::Rls => {
                let actor = cli::resolve_actor(actor_override, config)?;
                cli::check::rls(config, &actor).await
            }
            CheckCommand::Webhook => cli::check::webhook(config).await,
            CheckCommand::Forum => cli::check::forum(config).await,
        },
    }
}
