//! Integration tests for image, video and diagram routes

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
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer, max_poll_attempts: u32) -> Router {
    let mut settings = Settings::default();
    settings.openai.base_url = server.uri();
    settings.openai.api_key_env = None;
    settings.openai.api_key = Some("test-key".to_string());
    settings.luma.provider.base_url = server.uri();
    settings.luma.provider.api_key_env = None;
    settings.luma.provider.api_key = Some("luma-key".to_string());
    settings.luma.poll_interval_ms = 1;
    settings.luma.max_poll_attempts = max_poll_attempts;
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

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_generate_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({"model": "dall-e-3", "n": 1, "size": "1024x1024"})))
        .and(body_string_contains("A ribosome. System: "))
        .and(body_string_contains("suitable for scientific visualization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 0,
            "data": [{"url": "https://images.example.com/ribosome.png"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server, 3), "/images/generate", json!({"prompt": "A ribosome"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"image_url": "https://images.example.com/ribosome.png"}));
}

#[tokio::test]
async fn test_generate_image_without_url_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server, 3), "/images/generate", json!({"prompt": "A ribosome"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Image backend returned no image URL");
}

#[tokio::test]
async fn test_search_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("web_search_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Found one:\n{\"image_url\": \"https://commons.example.org/neuron.jpg\"}",
        )))
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server, 3), "/images/search", json!({"prompt": "a neuron"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_url"], "https://commons.example.org/neuron.jpg");
}

#[tokio::test]
async fn test_generate_video_polls_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generations"))
        .and(body_partial_json(json!({
            "prompt": "A beating heart",
            "model": "ray-2",
            "resolution": "720p",
            "duration": "5s",
            "loop": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "gen-1", "state": "queued"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "gen-1", "state": "dreaming"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "state": "completed",
            "assets": {"video": "https://cdn.example.com/gen-1.mp4"}
        })))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server, 10),
        "/videos/generate",
        json!({"prompt": "A beating heart"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"video_url": "https://cdn.example.com/gen-1.mp4"}));
}

#[tokio::test]
async fn test_generate_video_failure_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "gen-2", "state": "queued"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-2",
            "state": "failed",
            "failure_reason": "prompt rejected"
        })))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server, 10),
        "/videos/generate",
        json!({"prompt": "Something", "loop": true}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Generation failed: prompt rejected");
}

#[tokio::test]
async fn test_generate_video_gives_up_after_max_polls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "gen-3", "state": "queued"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "gen-3", "state": "dreaming"})))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server, 2), "/videos/generate", json!({"prompt": "Slow"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("still pending after 2 polls"));
}

#[tokio::test]
async fn test_generate_diagram() {
    let server = MockServer::start().await;
    let latex = "```latex\n\\documentclass{article}\n\\usepackage{axodraw2}\n\\begin{document}\n\\begin{axopicture}(200,120)\n\\Line(0,0)(200,120)\n\\end{axopicture}\n\\end{document}\n%% Diagram Size: 200 x 120\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Prompt: electron-positron annihilation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(latex)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server, 3),
        "/diagram/generate",
        json!({"prompt": "electron-positron annihilation"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagram_width"], 200.0);
    assert_eq!(body["diagram_height"], 120.0);
    let document = body["document_content"].as_str().unwrap();
    assert!(document.starts_with("\\documentclass{article}"));
    assert!(!document.contains("```"));
}

#[tokio::test]
async fn test_diagram_without_size_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\\begin{axopicture}(1,1)\\end{axopicture}")))
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server, 3), "/diagram/generate", json!({"prompt": "x"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Diagram size comment not found in the output.");
}
