//! Bounded in-memory conversation history.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::Role;

#[derive(Debug, Clone, PartialEq)]
struct Message {
    role: Role,
    content: String,
}

/// History per session id, trimmed to the most recent exchanges.
#[derive(Debug)]
pub struct SessionStore {
    max_history: usize,
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    /// Keep at most `max_history` exchanges (user + assistant) per session.
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Start an empty session and return its id.
    pub fn create_session(&self) -> String {
        let id = format!("session_{}", uuid::Uuid::new_v4().simple());
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id.clone(), Vec::new());
        id
    }

    /// Record one exchange. Unknown ids start a new session.
    pub fn add_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let messages = sessions.entry(session_id.to_string()).or_default();
        messages.push(Message {
            role: Role::User,
            content: user.to_string(),
        });
        messages.push(Message {
            role: Role::Assistant,
            content: assistant.to_string(),
        });

        let limit = self.max_history * 2;
        if messages.len() > limit {
            let excess = messages.len() - limit;
            messages.drain(..excess);
        }
    }

    /// History rendered as `User: ...` / `Assistant: ...` lines, or `None`
    /// when the session has none.
    pub fn history(&self, session_id: &str) -> Option<String> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let messages = sessions.get(session_id).filter(|m| !m.is_empty())?;
        Some(
            messages
                .iter()
                .map(|m| match m.role {
                    Role::User => format!("User: {}", m.content),
                    Role::Assistant => format!("Assistant: {}", m.content),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn clear_session(&self, session_id: &str) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(session_id);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(2)
    }
}
