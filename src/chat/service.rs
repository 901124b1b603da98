//! Session chat: history, memory and reply generation

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::memory::SummaryMemory;
use super::message::{ChatTurn, StoredMessage};
use super::store::ChatStore;
use crate::agent::catalog::{CHAT_ASSISTANT, STRUCTURED_CHAT_ASSISTANT};
use crate::agent::Runner;
use crate::config::ChatConfig;
use crate::error::Result;

/// How the conversation context reaches the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// One role-tagged chat message per context entry
    Messages,
    /// Context flattened into `Label: content` lines in a single prompt
    Transcript,
}

/// Result of one chat turn
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub session_id: Uuid,
    pub reply: String,
    /// Contents of every stored message after the turn
    pub history: Vec<String>,
}

pub struct ChatService {
    runner: Arc<Runner>,
    store: Arc<dyn ChatStore>,
    memory: Arc<SummaryMemory>,
    recent_messages: usize,
    welcome_message: String,
}

impl ChatService {
    pub fn new(
        runner: Arc<Runner>,
        store: Arc<dyn ChatStore>,
        memory: Arc<SummaryMemory>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            runner,
            store,
            memory,
            recent_messages: config.recent_messages,
            welcome_message: config.welcome_message.clone(),
        }
    }

    /// Start a session with a welcome message and the user's first message
    pub async fn create_session(&self, message: &str, style: PromptStyle) -> Result<ChatExchange> {
        let session_id = Uuid::new_v4();
        self.memory.ensure(session_id);

        self.store
            .append(
                session_id,
                &[
                    StoredMessage::system(self.welcome_message.clone()),
                    StoredMessage::human(message),
                ],
            )
            .await?;

        info!(session_id = %session_id, "Chat session created");
        self.respond(session_id, message, style).await
    }

    /// Continue a session; an unseen id starts a fresh history
    pub async fn send_message(
        &self,
        session_id: Uuid,
        message: &str,
        style: PromptStyle,
    ) -> Result<ChatExchange> {
        self.memory.ensure(session_id);
        self.store
            .append(session_id, &[StoredMessage::human(message)])
            .await?;

        self.respond(session_id, message, style).await
    }

    /// All stored messages of a session
    pub async fn history(&self, session_id: Uuid) -> Result<Vec<StoredMessage>> {
        self.store.messages(session_id).await
    }

    /// Contents of all stored messages of a session
    pub async fn contents(&self, session_id: Uuid) -> Result<Vec<String>> {
        let messages = self.store.messages(session_id).await?;
        Ok(messages.into_iter().map(|m| m.content).collect())
    }

    /// Context for the next reply.
    ///
    /// Sessions tracked in memory get the running summary (when there is
    /// one) followed by the most recent messages; others get everything.
    pub async fn context(&self, session_id: Uuid) -> Result<Vec<StoredMessage>> {
        let messages = self.store.messages(session_id).await?;

        let Some(summary) = self.memory.summary(session_id).await else {
            return Ok(messages);
        };

        let start = messages.len().saturating_sub(self.recent_messages);
        let mut context = Vec::with_capacity(self.recent_messages + 1);
        if !summary.is_empty() {
            context.push(StoredMessage::system(format!("Conversation Summary: {}", summary)));
        }
        context.extend(messages.into_iter().skip(start));

        Ok(context)
    }

    /// Stateless chat over a client-held history
    pub async fn chat(&self, history: &[ChatTurn], user_message: &str) -> Result<ChatTurn> {
        let prompt = stateless_prompt(history, user_message);
        self.runner.run_json(&STRUCTURED_CHAT_ASSISTANT, &prompt).await
    }

    async fn respond(&self, session_id: Uuid, message: &str, style: PromptStyle) -> Result<ChatExchange> {
        let context = self.context(session_id).await?;

        let reply = match style {
            PromptStyle::Messages => {
                let messages = context.iter().map(StoredMessage::to_chat_message).collect();
                self.runner.run_messages(&CHAT_ASSISTANT, messages).await?
            }
            PromptStyle::Transcript => {
                let prompt = transcript(&context);
                self.runner.run_text(&CHAT_ASSISTANT, &prompt).await?
            }
        };

        self.store
            .append(session_id, &[StoredMessage::ai(reply.clone())])
            .await?;
        self.memory.save_context(session_id, message, &reply).await;

        let history = self.contents(session_id).await?;

        info!(session_id = %session_id, messages = history.len(), "Chat turn completed");

        Ok(ChatExchange {
            session_id,
            reply,
            history,
        })
    }
}

/// Flatten messages into `Label: content` lines
pub fn transcript(messages: &[StoredMessage]) -> String {
    messages
        .iter()
        .map(StoredMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for stateless chat: prior turns then the new user message
pub fn stateless_prompt(history: &[ChatTurn], user_message: &str) -> String {
    let previous = history
        .iter()
        .map(|turn| format!("{}: {}", capitalize(&turn.role), turn.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Previous Conversation:\n{}\n\nUser: {}\nAssistant:",
        previous, user_message
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
