//! Session-scoped chat transcript.
//!
//! Append-only and chronological; never persisted. The only removal is an
//! explicit user "clear chat".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    /// Markdown for agent messages, raw input for user messages.
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message and return a copy of it.
    pub fn push_user(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::new(Role::User, content))
    }

    /// Append an agent message and return a copy of it.
    pub fn push_agent(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::new(Role::Agent, content))
    }

    fn push(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
