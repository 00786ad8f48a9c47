//! Virtual tutor session: a transcript over the chat webhook.

use crate::domain::UserId;
use crate::error::{Result, ValidationError};
use crate::webhook::{WebhookClient, DEFAULT_SESSION_ID};

/// A single exchange in the transcript.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_message: String,
    pub tutor_reply: String,
}

/// A stateful chat session with the tutor webhook.
///
/// The transcript lives client-side; the webhook only sees the session
/// ID, which it may use for its own context windowing.
pub struct TutorSession {
    client: WebhookClient,
    user_id: Option<UserId>,
    session_id: String,
    transcript: Vec<ChatTurn>,
}

impl TutorSession {
    pub fn new(client: WebhookClient, user_id: Option<UserId>) -> Self {
        Self {
            client,
            user_id,
            session_id: DEFAULT_SESSION_ID.to_string(),
            transcript: Vec::new(),
        }
    }

    /// Send one message and record the exchange.
    ///
    /// Empty or whitespace-only messages are rejected before any
    /// network traffic. A webhook that answers without any reply text
    /// is recorded with a placeholder so the transcript stays aligned.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let reply = self
            .client
            .send_message(message, self.user_id.as_ref(), &self.session_id)
            .await?;
        let text = reply
            .reply_text()
            .unwrap_or("(the tutor returned an empty reply)")
            .to_string();

        self.transcript.push(ChatTurn {
            user_message: message.to_string(),
            tutor_reply: text.clone(),
        });
        Ok(text)
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}
