// One chat turn: record the user's text, produce a reply, record the reply.
// Shared by the web handlers and the command-line entry point.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::generator::{ResponseGenerator, SentenceSource};
use crate::session::{Message, Role, Session, SessionId, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub user: Message,
    pub assistant: Message,
}

impl Exchange {
    /// The two-line transcript printed by the command-line entry point.
    pub fn to_cli_output(&self) -> String {
        format!("User: {}\nBot: {}", self.user.content(), self.assistant.content())
    }
}

#[instrument(skip_all, fields(prompt_len = prompt.len()))]
pub fn exchange<S: SentenceSource>(
    session: &mut Session,
    generator: &ResponseGenerator<S>,
    prompt: &str,
) -> Exchange {
    let user = session.append(Role::User, prompt).clone();
    let reply = generator.generate(prompt);
    let assistant = session.append(Role::Assistant, reply).clone();
    debug!(messages = session.len(), "Exchange recorded");
    Exchange { user, assistant }
}

/// Runs [`exchange`] against a stored session, holding its write lock for the
/// whole turn.
pub async fn exchange_in_store<S: SentenceSource>(
    store: &SessionStore,
    id: SessionId,
    generator: &ResponseGenerator<S>,
    prompt: &str,
) -> Result<Exchange> {
    store
        .with_session(id, |session| exchange(session, generator, prompt))
        .await
}
