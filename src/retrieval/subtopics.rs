//! Subtopic similarity search and the tool-calling research agent

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::store::{SubtopicMatch, VectorStore};
use super::Embedder;
use crate::agent::catalog::SUBTOPIC_RESEARCHER;
use crate::agent::Runner;
use crate::backend::{ChatMessage, Tool, ToolCall};
use crate::error::{AppError, Result};

pub const QUERY_SUBTOPICS_TOOL: &str = "query_subtopics";

#[derive(Debug, Deserialize)]
struct QueryArguments {
    query: String,
}

fn query_subtopics_tool() -> Tool {
    Tool::function(
        QUERY_SUBTOPICS_TOOL,
        "Find course subtopics similar to a natural language query. \
Returns a JSON array of subtopics with id, name, text, topicId and similarity.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language description of what to look up"
                }
            },
            "required": ["query"]
        }),
    )
}

pub struct SubtopicResearcher {
    runner: Arc<Runner>,
    embedder: Arc<Embedder>,
    store: Arc<dyn VectorStore>,
    max_steps: usize,
}

impl SubtopicResearcher {
    pub fn new(
        runner: Arc<Runner>,
        embedder: Arc<Embedder>,
        store: Arc<dyn VectorStore>,
        max_steps: usize,
    ) -> Self {
        Self {
            runner,
            embedder,
            store,
            max_steps,
        }
    }

    /// Subtopics closest to `query`
    pub async fn search(&self, query: &str, top_n: usize) -> Result<Vec<SubtopicMatch>> {
        let vector = self.embedder.embed(query).await?;
        self.store.search_subtopics(&vector, top_n).await
    }

    /// Answer `query` with the research agent, which may look up subtopics
    /// through the `query_subtopics` tool before replying.
    pub async fn answer(&self, query: &str, top_n: usize) -> Result<String> {
        let tools = vec![query_subtopics_tool()];
        let mut messages = vec![ChatMessage::user(query)];

        for step in 0..self.max_steps {
            let mut request = self.runner.request_for(&SUBTOPIC_RESEARCHER, messages.clone());
            request.tools = Some(tools.clone());

            let response = self.runner.backend().chat_completion(request).await?;
            let reply = response.first_message()?.clone();

            let calls = reply.tool_calls.clone().unwrap_or_default();
            if calls.is_empty() {
                info!(steps = step + 1, "Research agent answered");
                return Ok(reply.text().to_string());
            }

            messages.push(reply);
            for call in &calls {
                let output = self.run_tool(call, top_n).await?;
                messages.push(ChatMessage::tool(call.id.clone(), output));
            }
        }

        Err(AppError::Agent(format!(
            "{} did not answer within {} tool steps",
            SUBTOPIC_RESEARCHER.name, self.max_steps
        )))
    }

    /// Execute one tool call; argument problems are reported back to the model
    async fn run_tool(&self, call: &ToolCall, top_n: usize) -> Result<String> {
        if call.function.name != QUERY_SUBTOPICS_TOOL {
            warn!(tool = %call.function.name, "Model requested an unknown tool");
            return Ok(json!({ "error": format!("Unknown tool: {}", call.function.name) }).to_string());
        }

        let args: QueryArguments = match serde_json::from_str(&call.function.arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(json!({ "error": format!("Invalid arguments: {}", e) }).to_string());
            }
        };

        debug!(query = %args.query, "Running subtopic lookup tool");

        let results = self.search(&args.query, top_n).await?;
        Ok(serde_json::to_string(&results)?)
    }
}
