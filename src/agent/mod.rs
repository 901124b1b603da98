//! Agents: configured hosted-LLM calls with fixed instructions and output shape

pub mod catalog;
pub mod output;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{ChatCompletionRequest, ChatMessage, LlmBackend, ResponseFormat};
use crate::error::Result;

pub use output::{parse_json_output, strip_code_fence};

/// Shape of an agent's final output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A JSON object deserialized into a typed value
    Json,
    /// Plain text
    Text,
}

/// A configured LLM call: model, instructions and output shape
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub name: &'static str,
    pub model: &'static str,
    pub temperature: Option<f32>,
    pub instructions: &'static str,
    pub output: OutputKind,
    /// Use the provider's hosted web search
    pub web_search: bool,
}

/// Executes agents against an LLM backend
pub struct Runner {
    backend: Arc<dyn LlmBackend>,
    model_overrides: HashMap<String, String>,
}

impl Runner {
    /// Override keys match agent names case-insensitively
    pub fn new(backend: Arc<dyn LlmBackend>, model_overrides: HashMap<String, String>) -> Self {
        Self {
            backend,
            model_overrides: model_overrides
                .into_iter()
                .map(|(name, model)| (name.to_lowercase(), model))
                .collect(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn LlmBackend> {
        &self.backend
    }

    /// Model the agent runs on, after overrides
    pub fn model_for(&self, agent: &Agent) -> String {
        self.model_overrides
            .get(&agent.name.to_lowercase())
            .cloned()
            .unwrap_or_else(|| agent.model.to_string())
    }

    /// Build a completion request: agent instructions followed by `messages`
    pub fn request_for(&self, agent: &Agent, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(agent.instructions));
        all.extend(messages);

        let mut request = ChatCompletionRequest::new(self.model_for(agent), all);

        if agent.web_search {
            // Search models reject sampling and response_format parameters
            request.web_search_options = Some(serde_json::json!({}));
        } else {
            request.temperature = agent.temperature;
            if agent.output == OutputKind::Json {
                request.response_format = Some(ResponseFormat::json_object());
            }
        }

        request
    }

    /// Run the agent over a conversation and return the reply text
    pub async fn run_messages(&self, agent: &Agent, messages: Vec<ChatMessage>) -> Result<String> {
        let request = self.request_for(agent, messages);

        debug!(agent = %agent.name, model = %request.model, "Running agent");

        let response = self.backend.chat_completion(request).await?;
        let reply = response.first_message()?.text().to_string();

        info!(agent = %agent.name, reply_len = reply.len(), "Agent finished");

        Ok(reply)
    }

    /// Run the agent on a single input and return the reply text
    pub async fn run_text(&self, agent: &Agent, input: &str) -> Result<String> {
        self.run_messages(agent, vec![ChatMessage::user(input)]).await
    }

    /// Run the agent on a single input and parse its JSON reply
    pub async fn run_json<T: DeserializeOwned>(&self, agent: &Agent, input: &str) -> Result<T> {
        let reply = self.run_text(agent, input).await?;
        parse_json_output(agent.name, &reply)
    }
}
