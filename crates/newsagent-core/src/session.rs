//! Per-session chat log
//!
//! A [`ChatLog`] is an append-only, ordered record of the turns exchanged in one
//! chat session. It exists for display: the surface that owns it replays it to
//! the user, while routing and tool selection treat every query independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person asking
    User,
    /// The agent answering
    Assistant,
}

impl ChatRole {
    /// Display label for the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single entry in the chat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only ordered log of one chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLog {
    session_id: String,
    turns: Vec<ChatTurn>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    /// Create an empty log with a fresh session id
    pub fn new() -> Self {
        Self::with_session_id(uuid::Uuid::new_v4().to_string())
    }

    /// Create an empty log for a known session id
    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: Vec::new(),
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Record a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(ChatRole::User, content));
    }

    /// Record an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(ChatRole::Assistant, content));
    }

    /// All turns in the order they were recorded
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The most recent turn, if any
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
