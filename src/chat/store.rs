//! Chat history persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::message::StoredMessage;
use crate::error::Result;

/// Append-only per-session message log
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Append messages to a session, in order
    async fn append(&self, session_id: Uuid, messages: &[StoredMessage]) -> Result<()>;

    /// All messages of a session, oldest first
    async fn messages(&self, session_id: Uuid) -> Result<Vec<StoredMessage>>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL chat history in the `chat_history` table
#[derive(Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the history table and its index if missing
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                id BIGSERIAL PRIMARY KEY,
                session_id UUID NOT NULL,
                message JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_history_session_id ON chat_history (session_id)",
        )
        .execute(&self.pool)
        .await?;

        info!("Chat history schema ready");
        Ok(())
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn append(&self, session_id: Uuid, messages: &[StoredMessage]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for message in messages {
            sqlx::query(
                r#"
                INSERT INTO chat_history (session_id, message, created_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(session_id)
            .bind(message.to_document())
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(session_id = %session_id, count = messages.len(), "Appended chat messages");
        Ok(())
    }

    async fn messages(&self, session_id: Uuid) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT message, created_at
            FROM chat_history
            WHERE session_id = $1
            ORDER BY id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let document: Value = row.try_get("message")?;
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                StoredMessage::from_document(&document, created_at)
            })
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// In-memory chat history
#[derive(Default)]
pub struct InMemoryChatStore {
    sessions: RwLock<HashMap<Uuid, Vec<StoredMessage>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn append(&self, session_id: Uuid, messages: &[StoredMessage]) -> Result<()> {
        self.sessions
            .write()
            .entry(session_id)
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn messages(&self, session_id: Uuid) -> Result<Vec<StoredMessage>> {
        Ok(self
            .sessions
            .read()
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
