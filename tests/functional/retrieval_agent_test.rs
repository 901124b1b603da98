//! Functional tests for the subtopic research agent's tool-calling loop

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use exolab_agents::{
    api::routes::create_router,
    chat::InMemoryChatStore,
    config::Settings,
    retrieval::{InMemoryVectorStore, SubtopicRecord},
    AppState, Providers,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn subtopics() -> Vec<SubtopicRecord> {
    vec![
        SubtopicRecord {
            id: "7".to_string(),
            name: "Mitosis".to_string(),
            text: "Mitosis splits one nucleus into two identical nuclei.".to_string(),
            topic_id: "3".to_string(),
            embedding: vec![1.0, 0.0, 0.0],
        },
        SubtopicRecord {
            id: "8".to_string(),
            name: "Meiosis".to_string(),
            text: "Meiosis halves the chromosome count.".to_string(),
            topic_id: "3".to_string(),
            embedding: vec![0.0, 1.0, 0.0],
        },
    ]
}

fn app(server: &MockServer, max_steps: usize) -> Router {
    let mut settings = Settings::default();
    settings.openai.base_url = server.uri();
    settings.openai.api_key_env = None;
    settings.openai.api_key = Some("test-key".to_string());
    settings.rate_limit.enabled = false;
    settings.chat.tool_max_steps = max_steps;

    let providers = Providers::from_settings(&settings).unwrap();
    let state = AppState::new(
        settings,
        providers,
        Arc::new(InMemoryChatStore::new()),
        Arc::new(InMemoryVectorStore::with_subtopics(subtopics())),
    );
    create_router(Arc::new(state))
}

fn assistant(message: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 0,
        "model": "gpt-4o",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
    })
}

fn tool_call(name: &str, arguments: &str) -> Value {
    assistant(json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": {"name": name, "arguments": arguments}
        }]
    }))
}

async fn mount_embeddings(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.9, 0.1, 0.0]}]
        })))
        .mount(server)
        .await;
}

async fn ask(app: Router, query: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat/query_subtopics_agent")
        .header("content-type", "application/json")
        .body(Body::from(json!({"query": query, "top_n": 1}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_agent_answers_from_tool_results() {
    let server = MockServer::start().await;
    mount_embeddings(&server).await;

    // Second round: the tool output is in the conversation
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("tool_call_id"))
        .and(body_string_contains("two identical nuclei"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant(json!({
            "role": "assistant",
            "content": "Mitosis produces two identical nuclei."
        }))))
        .expect(1)
        .mount(&server)
        .await;

    // First round: the model asks for a lookup
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("query_subtopics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tool_call("query_subtopics", r#"{"query": "cell division"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = ask(app(&server, 5), "How do cells divide?").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "Mitosis produces two identical nuclei."}));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_the_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Unknown tool: browse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant(json!({
            "role": "assistant",
            "content": "I could not look that up."
        }))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call("browse", "{}")))
        .mount(&server)
        .await;

    let (status, body) = ask(app(&server, 5), "Anything").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "I could not look that up.");
}

#[tokio::test]
async fn test_agent_gives_up_after_max_steps() {
    let server = MockServer::start().await;
    mount_embeddings(&server).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tool_call("query_subtopics", r#"{"query": "again"}"#)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = ask(app(&server, 2), "Loop forever").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Subtopic Research Agent did not answer within 2 tool steps"
    );
}
