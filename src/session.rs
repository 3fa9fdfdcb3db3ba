//! Per-session chat transcripts.
//!
//! A [`Session`] is an append-only list of [`Message`]s. The [`SessionStore`]
//! keeps one session per [`SessionId`]; callers always name the session they
//! operate on, there is no ambient "current" session.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::DEFAULT_SESSION_IDLE_SECS;
use crate::error::{ChatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Who authored a message. Role strings that are neither `user` nor
/// `assistant` are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(CustomRole),
}

/// A role name other than `user` or `assistant`. Only built through
/// `Role::from`, so it never holds one of the known names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomRole(String);

impl CustomRole {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(custom) => custom.as_str(),
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(CustomRole(raw)),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(custom) => custom.0,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
    last_touched: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            last_touched: Instant::now(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without validating either field. There is no upper bound on
    /// the number of messages a session holds.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.touch();
        self.messages.push(Message::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    fn is_idle(&self, ttl: Duration) -> bool {
        self.last_touched.elapsed() >= ttl
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn all(&self) -> Transcript {
        Transcript {
            messages: self.messages.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Ordered snapshot of a session's messages. Iterating borrows, so the same
/// transcript can be walked as many times as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sessions keyed by id. A session untouched for longer than the idle TTL
/// has ended; it is dropped the next time any caller takes the write lock.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::from_secs(*DEFAULT_SESSION_IDLE_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, Session>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(self.idle_ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
    }

    /// Returns `true` when a new, empty session was created.
    pub async fn initialize(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        if let Some(session) = sessions.get_mut(&id) {
            session.touch();
            return false;
        }
        sessions.insert(id, Session::new());
        info!(session = %id, "Session initialized");
        true
    }

    pub async fn append(&self, id: SessionId, role: Role, content: impl Into<String>) -> Result<Message> {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        let session = sessions.get_mut(&id).ok_or(ChatError::SessionNotFound(id))?;
        let message = session.append(role, content).clone();
        debug!(session = %id, role = %message.role(), count = session.len(), "Message appended");
        Ok(message)
    }

    pub async fn all(&self, id: SessionId) -> Result<Transcript> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(Session::all)
            .ok_or(ChatError::SessionNotFound(id))
    }

    /// Runs `f` against the session while holding the write lock, so a whole
    /// exchange lands in the transcript without interleaving.
    pub async fn with_session<T>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        let session = sessions.get_mut(&id).ok_or(ChatError::SessionNotFound(id))?;
        session.touch();
        Ok(f(session))
    }

    /// Discards the session. Returns `true` if it existed.
    pub async fn end(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "Session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
