//! Per-user chat sessions held in memory for the life of the process.
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::lessons::LessonFilter;
use crate::openai::{Message, Role};

/// Number of messages kept in a session's history after each turn.
pub const MAX_HISTORY: usize = 10;

pub const DEFAULT_USER_ID: &str = "default-user";

#[derive(Clone, Debug)]
pub struct ChatSession {
    pub user_id: String,
    history: Vec<Message>,
    filter: Option<LessonFilter>,
}

impl ChatSession {
    fn new(user_id: &str, filter: Option<LessonFilter>) -> Self {
        Self {
            user_id: user_id.to_string(),
            history: Vec::new(),
            filter,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn filter(&self) -> Option<&LessonFilter> {
        self.filter.as_ref()
    }

    // A turn without lesson IDs keeps whatever filter was applied
    // before.
    fn apply_filter(&mut self, filter: Option<LessonFilter>) {
        if filter.is_some() {
            self.filter = filter;
        }
    }

    fn record_turn(&mut self, input: &str, output: &str) {
        self.history.push(Message::new(Role::User, input));
        self.history.push(Message::new(Role::Assistant, output));
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }
}

/// What a chat turn needs from the session, copied out so no lock is
/// held while the agent runs.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub history: Vec<Message>,
    pub filter: Option<LessonFilter>,
    pub created: bool,
}

/// Maps user IDs to chat sessions.
///
/// Holds at most `capacity` sessions. Creating a session beyond that
/// evicts the least recently used one.
pub struct SessionStore {
    sessions: Mutex<LruCache<String, ChatSession>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.sessions.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a session without marking it as used.
    pub fn get(&self, user_id: &str) -> Option<ChatSession> {
        self.sessions.lock().peek(user_id).cloned()
    }

    /// Resolves the session for `user_id`, creating it with `filter`
    /// when it doesn't exist yet. An existing session only has its
    /// filter replaced when `filter` is present.
    pub fn begin_turn(&self, user_id: &str, filter: Option<LessonFilter>) -> SessionSnapshot {
        let mut sessions = self.sessions.lock();

        if let Some(session) = sessions.get_mut(user_id) {
            session.apply_filter(filter);
            return SessionSnapshot {
                history: session.history.clone(),
                filter: session.filter.clone(),
                created: false,
            };
        }

        tracing::info!("Created chat session for user {}", user_id);
        let snapshot = SessionSnapshot {
            history: Vec::new(),
            filter: filter.clone(),
            created: true,
        };
        let session = ChatSession::new(user_id, filter);
        if let Some((evicted, _)) = sessions.push(user_id.to_string(), session) {
            tracing::info!("Evicting chat session for user {}", evicted);
        }
        snapshot
    }

    /// Appends the user's input and the agent's output to the
    /// session's history and trims it to `MAX_HISTORY`.
    pub fn finish_turn(&self, user_id: &str, input: &str, output: &str) {
        match self.sessions.lock().get_mut(user_id) {
            Some(session) => session.record_turn(input, output),
            None => {
                tracing::warn!(
                    "Session for user {} was evicted before its turn finished",
                    user_id
                );
            }
        }
    }
}
