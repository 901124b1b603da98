//! Integration tests for chat sessions

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use exolab_agents::{
    api::routes::create_router,
    chat::InMemoryChatStore,
    config::Settings,
    retrieval::InMemoryVectorStore,
    AppState, Providers,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer) -> Router {
    let mut settings = Settings::default();
    settings.openai.base_url = server.uri();
    settings.openai.api_key_env = None;
    settings.openai.api_key = Some("test-key".to_string());
    settings.rate_limit.enabled = false;

    let providers = Providers::from_settings(&settings).unwrap();
    let state = AppState::new(
        settings,
        providers,
        Arc::new(InMemoryChatStore::new()),
        Arc::new(InMemoryVectorStore::new()),
    );
    create_router(Arc::new(state))
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 0,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

async fn reply_with(server: &MockServer, needle: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_session_flow() {
    let server = MockServer::start().await;
    // Follow-up: the earlier question is still in the context sent to the model
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Give me an example"))
        .and(body_string_contains("What is osmosis?"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Plant roots absorbing water.")),
        )
        .expect(1)
        .mount(&server)
        .await;
    reply_with(&server, "What is osmosis?", "Osmosis is the movement of water.").await;
    let app = app(&server);

    let (status, created) = post_json(
        app.clone(),
        "/chat/create",
        json!({"message": "What is osmosis?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["reply"], "Osmosis is the movement of water.");
    assert_eq!(
        created["history"],
        json!([
            "Welcome to the chat!",
            "What is osmosis?",
            "Osmosis is the movement of water."
        ])
    );

    let session_id = created["session_id"].as_str().unwrap().to_string();

    let (status, followup) = post_json(
        app.clone(),
        "/chat/message",
        json!({"session_id": session_id, "message": "Give me an example"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(followup["session_id"], session_id.as_str());
    assert_eq!(followup["reply"], "Plant roots absorbing water.");
    assert_eq!(followup["history"].as_array().unwrap().len(), 5);

    let (status, history) = get(app.clone(), &format!("/chat/messages?session_id={}", session_id)).await;

    assert_eq!(status, StatusCode::OK);
    let roles: Vec<&str> = history["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["system", "user", "agent", "user", "agent"]);

    let (status, contents) = post_json(
        app,
        "/chat/getmessages",
        json!({"session_id": session_id}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(contents["messages"][4], "Plant roots absorbing water.");
}

#[tokio::test]
async fn test_transcript_session_sends_labelled_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("System: Welcome to the chat!"))
        .and(body_string_contains("Human: Define mitosis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Cell division.")))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/newchat/create",
        json!({"message": "Define mitosis"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Cell division.");
    assert_eq!(body["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_message_to_unknown_session_starts_fresh() {
    let server = MockServer::start().await;
    reply_with(&server, "Hello again", "Hi!").await;
    let session_id = "0d8f3a52-55a4-4f8e-a3c4-1a2b3c4d5e6f";

    let (status, body) = post_json(
        app(&server),
        "/newchat/message",
        json!({"session_id": session_id, "message": "Hello again"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], session_id);
    assert_eq!(body["history"], json!(["Hello again", "Hi!"]));
}

#[tokio::test]
async fn test_malformed_session_id_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        app(&server),
        "/chat/message",
        json!({"session_id": "not-a-session", "message": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("not-a-session"));

    let (status, _) = get(app(&server), "/chat/messages?session_id=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stateless_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Previous Conversation:"))
        .and(body_string_contains("User: Hello!"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"role": "assistant", "content": "Hi, how can I help?"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/chat",
        json!({
            "history": [
                {"role": "user", "content": "Hello!"},
                {"role": "assistant", "content": "Hello! How can I help?"}
            ],
            "user_message": "Tell me about cells"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"response": {"role": "assistant", "content": "Hi, how can I help?"}})
    );
}
