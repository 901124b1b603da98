//! Per-session summary buffer memory
//!
//! Recent exchanges are kept verbatim in a buffer. Once the buffer grows
//! past the token limit the oldest messages are folded into a running
//! summary written by the summarizer agent.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::message::StoredMessage;
use crate::agent::catalog::CONVERSATION_SUMMARIZER;
use crate::agent::Runner;

#[derive(Debug, Clone, Default)]
struct SessionMemory {
    summary: String,
    buffer: Vec<StoredMessage>,
}

/// Rough token count, about four characters per token
pub fn estimate_tokens(messages: &[StoredMessage]) -> usize {
    messages.iter().map(|m| m.content.chars().count()).sum::<usize>() / 4
}

/// Number of leading messages to drop so the rest fits in `token_limit`
fn overflow_len(buffer: &[StoredMessage], token_limit: usize) -> usize {
    (0..buffer.len())
        .find(|&start| estimate_tokens(&buffer[start..]) <= token_limit)
        .unwrap_or(buffer.len())
}

/// Summary prompt for folding `lines` into `summary`
pub fn summary_prompt(summary: &str, lines: &[StoredMessage]) -> String {
    let transcript = lines
        .iter()
        .map(StoredMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Current summary:\n{}\n\nNew lines of conversation:\n{}\n\nNew summary:",
        summary, transcript
    )
}

/// Each session sits behind its own async lock, so turns of one session
/// are folded into the summary one at a time while other sessions proceed.
pub struct SummaryMemory {
    sessions: DashMap<Uuid, Arc<Mutex<SessionMemory>>>,
    runner: Arc<Runner>,
    token_limit: usize,
}

impl SummaryMemory {
    pub fn new(runner: Arc<Runner>, token_limit: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            runner,
            token_limit,
        }
    }

    fn session(&self, session_id: Uuid) -> Arc<Mutex<SessionMemory>> {
        self.sessions.entry(session_id).or_default().clone()
    }

    /// Start tracking a session if it is not tracked yet
    pub fn ensure(&self, session_id: Uuid) {
        self.sessions.entry(session_id).or_default();
    }

    pub fn contains(&self, session_id: Uuid) -> bool {
        self.sessions.contains_key(&session_id)
    }

    /// Current summary, `None` for untracked sessions
    pub async fn summary(&self, session_id: Uuid) -> Option<String> {
        let session = self.sessions.get(&session_id).map(|s| s.clone())?;
        let memory = session.lock().await;
        Some(memory.summary.clone())
    }

    /// Messages still held verbatim
    pub async fn buffer(&self, session_id: Uuid) -> Vec<StoredMessage> {
        let Some(session) = self.sessions.get(&session_id).map(|s| s.clone()) else {
            return Vec::new();
        };
        let memory = session.lock().await;
        memory.buffer.clone()
    }

    /// Record one exchange, summarizing the overflow if the buffer is full.
    ///
    /// Overflow leaves the buffer only once the summarizer has folded it in.
    /// A failed summary keeps it buffered for the next turn.
    pub async fn save_context(&self, session_id: Uuid, input: &str, output: &str) {
        let session = self.session(session_id);
        let mut memory = session.lock().await;

        memory.buffer.push(StoredMessage::human(input));
        memory.buffer.push(StoredMessage::ai(output));

        let overflow = overflow_len(&memory.buffer, self.token_limit);
        if overflow == 0 {
            return;
        }

        debug!(session_id = %session_id, overflow, "Summarizing overflow messages");

        let prompt = summary_prompt(&memory.summary, &memory.buffer[..overflow]);
        match self.runner.run_text(&CONVERSATION_SUMMARIZER, &prompt).await {
            Ok(summary) => {
                memory.summary = summary.trim().to_string();
                memory.buffer.drain(..overflow);
                info!(session_id = %session_id, "Conversation summary updated");
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Summarization failed, keeping buffer");
            }
        }
    }
}
