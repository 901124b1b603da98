//! Multi-turn chat sessions with persisted history and summary memory

pub mod memory;
pub mod message;
pub mod service;
pub mod store;

use uuid::Uuid;

use crate::error::{AppError, Result};

pub use memory::SummaryMemory;
pub use message::{ChatTurn, MessageRole, StoredMessage};
pub use service::{ChatExchange, ChatService, PromptStyle};
pub use store::{ChatStore, InMemoryChatStore, PgChatStore};

/// Parse a client supplied session id
pub fn parse_session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid session id: {}", raw)))
}
