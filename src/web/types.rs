// src/web/types.rs
use crate::agent::ChatTurn;
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ChatReply {
    pub success: bool,
    pub reply: String,
    pub conversation_id: Uuid,
}

impl ChatReply {
    pub fn new(reply: String, conversation_id: Uuid) -> Self {
        Self {
            success: true,
            reply,
            conversation_id,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub success: bool,
    pub service: &'static str,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ToolsResponse {
    pub success: bool,
    pub tools: Vec<ToolInfo>,
}

pub struct Session {
    pub turns: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            turns: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }
}

/// In-memory conversation histories, keyed by conversation id. Nothing is
/// persisted; the map lives and dies with the process.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a conversation id to its history, creating the session when
    /// the id is absent or unknown. Returns a snapshot so the lock is not
    /// held across network calls.
    pub fn open(&self, requested: Option<Uuid>) -> (Uuid, Vec<ChatTurn>) {
        let id = requested.unwrap_or_else(Uuid::new_v4);
        let mut sessions = self.lock();
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.last_active = Utc::now();
        (id, session.turns.clone())
    }

    pub fn append_turn(&self, id: Uuid, user: &str, assistant: &str) {
        let mut sessions = self.lock();
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.turns.push(ChatTurn {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });
        session.last_active = Utc::now();
    }

    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_conversation_id_creates_a_session() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        let (resolved, history) = store.open(Some(id));
        assert_eq!(resolved, id);
        assert!(history.is_empty());
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn test_turns_append_in_order() {
        let store = SessionStore::new();
        let (id, _) = store.open(None);
        store.append_turn(id, "find cook jobs", "Here are 10 cook jobs.");
        store.append_turn(id, "show page 2", "Here is page 2.");

        let (_, history) = store.open(Some(id));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user, "find cook jobs");
        assert_eq!(history[1].assistant, "Here is page 2.");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (first, _) = store.open(None);
        let (second, _) = store.open(None);
        assert_ne!(first, second);

        store.append_turn(first, "hello", "hi");
        let (_, history) = store.open(Some(second));
        assert!(history.is_empty());
    }
}
