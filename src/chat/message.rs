//! Persisted chat messages and their role vocabularies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::ChatMessage;
use crate::error::{AppError, Result};

/// Author of a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    Human,
    Ai,
}

impl MessageRole {
    /// Type tag in the persisted JSON document
    pub fn storage_type(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "human",
            MessageRole::Ai => "ai",
        }
    }

    pub fn from_storage_type(tag: &str) -> Option<Self> {
        match tag {
            "system" => Some(MessageRole::System),
            "human" => Some(MessageRole::Human),
            "ai" => Some(MessageRole::Ai),
            _ => None,
        }
    }

    /// Role label returned by the history API
    pub fn api_label(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "user",
            MessageRole::Ai => "agent",
        }
    }

    /// Speaker label in flattened transcripts
    pub fn transcript_label(&self) -> &'static str {
        match self {
            MessageRole::System => "System",
            MessageRole::Human => "Human",
            MessageRole::Ai => "AI",
        }
    }
}

/// A message in a session's history
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Ai, content)
    }

    /// Convert to a chat completion message
    pub fn to_chat_message(&self) -> ChatMessage {
        match self.role {
            MessageRole::System => ChatMessage::system(self.content.clone()),
            MessageRole::Human => ChatMessage::user(self.content.clone()),
            MessageRole::Ai => ChatMessage::assistant(self.content.clone()),
        }
    }

    /// `Label: content` line for transcripts
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.role.transcript_label(), self.content)
    }

    /// Persisted JSON document
    pub fn to_document(&self) -> Value {
        let tag = self.role.storage_type();
        json!({
            "type": tag,
            "data": {
                "content": self.content,
                "type": tag,
            }
        })
    }

    pub fn from_document(document: &Value, created_at: DateTime<Utc>) -> Result<Self> {
        let tag = document
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Internal("Stored message has no type".to_string()))?;

        let role = MessageRole::from_storage_type(tag)
            .ok_or_else(|| AppError::Internal(format!("Unknown stored message type: {}", tag)))?;

        let content = document
            .pointer("/data/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            role,
            content,
            created_at,
        })
    }
}

/// Role-tagged turn as exchanged with stateless chat clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}
