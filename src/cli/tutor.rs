//! `aula tutor` command: one-shot or interactive chat.

use dialoguer::{theme::ColorfulTheme, Input};

use crate::cli::{output, TutorArgs};
use crate::config::Config;
use crate::domain::UserId;
use crate::error::Result;
use crate::service::TutorSession;
use crate::webhook::WebhookClient;

pub async fn run(config: &Config, actor: Option<UserId>, args: &TutorArgs) -> Result<()> {
    let client = WebhookClient::new(config.webhook.clone());
    let mut session = TutorSession::new(client, actor);

    if let Some(message) = &args.message {
        let reply = session.send(message).await?;
        println!("{reply}");
        return Ok(());
    }

    output::note("Chatting with the tutor. Empty line or Ctrl-C to quit.");
    loop {
        let line: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;
        if line.trim().is_empty() {
            break;
        }

        match session.send(&line).await {
            Ok(reply) => println!("{} {reply}", output::highlight("tutor:")),
            Err(e) => output::error(&format!("tutor unavailable: {e}")),
        }
    }

    if !session.transcript().is_empty() {
        output::note(&format!(
            "{} exchanges this session",
            session.transcript().len()
        ));
    }
    Ok(())
}
