//! Integration tests for content, retrieval and health routes

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
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.openai.base_url = server.uri();
    settings.openai.api_key_env = None;
    settings.openai.api_key = Some("test-key".to_string());
    settings.luma.provider.base_url = server.uri();
    settings.luma.provider.api_key_env = None;
    settings.rate_limit.enabled = false;
    settings
}

fn app_with(settings: Settings, vectors: Arc<InMemoryVectorStore>) -> Router {
    let providers = Providers::from_settings(&settings).unwrap();
    let state = AppState::new(settings, providers, Arc::new(InMemoryChatStore::new()), vectors);
    create_router(Arc::new(state))
}

fn app(server: &MockServer) -> Router {
    app_with(settings_for(server), Arc::new(InMemoryVectorStore::new()))
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

fn embedding(values: &[f32]) -> Value {
    json!({
        "object": "list",
        "data": [{"object": "embedding", "index": 0, "embedding": values}],
        "model": "text-embedding-ada-002"
    })
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

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_extract_topics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("json_object"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"topics": ["Cell structure", "Photosynthesis"]}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/topics/extract",
        json!({"content": "Week 1: Cell structure\nWeek 2: Midterm\nWeek 3: Photosynthesis"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"topics": ["Cell structure", "Photosynthesis"]}));
}

#[tokio::test]
async fn test_extract_subtopics_keeps_topic_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Genetics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"topic": "Genetics", "subtopics": ["DNA", "Inheritance"]}"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Ecology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"topic": "Ecology", "subtopics": ["Food webs"]}"#,
        )))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/subtopics/extract",
        json!({"topics": ["Genetics", "Ecology"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": [
            {"topic": "Genetics", "subtopics": ["DNA", "Inheritance"]},
            {"topic": "Ecology", "subtopics": ["Food webs"]}
        ]})
    );
}

#[tokio::test]
async fn test_generate_explanations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Other Subtopics: DNA, Inheritance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"topic": "Genetics", "subtopic": "?", "explanation": "Explained."}"#,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/explanations/generate",
        json!({"data": [{"topic": "Genetics", "subtopics": ["DNA", "Inheritance"]}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let explanations = body["explanations"].as_array().unwrap();
    assert_eq!(explanations.len(), 2);
    assert_eq!(explanations[0]["subtopic"], "DNA");
    assert_eq!(explanations[1]["subtopic"], "Inheritance");
    assert_eq!(explanations[1]["explanation"], "Explained.");
}

#[tokio::test]
async fn test_generate_questions_covers_every_combination() {
    let server = MockServer::start().await;
    let reply = json!({
        "topic": "Genetics",
        "subtopic": "DNA",
        "difficulty": "Easy",
        "question_type": "Multiple Choice",
        "question": "What does DNA stand for?",
        "answers": ["A. Deoxyribonucleic acid", "B. Ribonucleic acid"],
        "correct_answer": "A. Deoxyribonucleic acid",
        "explanation": "DNA is deoxyribonucleic acid."
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Explanation: DNA carries genes."))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&reply.to_string())))
        .expect(6)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/questions/generate",
        json!({
            "data": [{"topic": "Genetics", "subtopics": ["DNA"]}],
            "explanations": [{"topic": "Genetics", "subtopic": "DNA", "explanation": "DNA carries genes."}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 6);

    let combos: Vec<(String, String)> = questions
        .iter()
        .map(|q| {
            (
                q["difficulty"].as_str().unwrap().to_string(),
                q["question_type"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(combos[0], ("Easy".to_string(), "Multiple Choice".to_string()));
    assert_eq!(combos[1], ("Easy".to_string(), "Open Answer".to_string()));
    assert_eq!(combos[5], ("Hard".to_string(), "Open Answer".to_string()));

    for question in questions {
        if question["question_type"] == "Open Answer" {
            assert_eq!(question["answers"], json!([]));
            assert_eq!(question["correct_answer"], "");
        } else {
            assert_eq!(question["answers"].as_array().unwrap().len(), 2);
        }
    }
}

#[tokio::test]
async fn test_book_toc_uses_web_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("web_search_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"book\": \"How Life Works\", \"table_of_contents\": [\"Life\", \"Cells\"]}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/books/toc",
        json!({"title": "How Life Works"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], "How Life Works");
    assert_eq!(body["table_of_contents"], json!(["Life", "Cells"]));
}

#[tokio::test]
async fn test_extract_course() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"topics": ["Evolution"], "description": "Intro biology.", "reading_materials": ["Campbell Biology"]}"#,
        )))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/courses/extract",
        json!({"content": "Week 1: Evolution. Reading: Campbell Biology"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], json!(["Evolution"]));
    assert_eq!(body["description"], "Intro biology.");
    assert_eq!(body["reading_materials"], json!(["Campbell Biology"]));
}

#[tokio::test]
async fn test_provider_error_becomes_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/topics/extract",
        json!({"content": "Week 1"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("429"));
    assert!(detail.contains("rate limited"));
}

#[tokio::test]
async fn test_vectorize() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_string_contains("text-embedding-ada-002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding(&[0.25, -0.5])))
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server), "/vectorize", json!({"text": "Biology is cool!"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"embedding": [0.25, -0.5]}));
}

#[tokio::test]
async fn test_query_subtopics_ranks_by_inner_product() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding(&[1.0, 0.0])))
        .mount(&server)
        .await;

    let vectors = Arc::new(InMemoryVectorStore::with_subtopics(vec![
        SubtopicRecord {
            id: "1".to_string(),
            name: "Food webs".to_string(),
            text: "Who eats whom".to_string(),
            topic_id: "10".to_string(),
            embedding: vec![0.0, 1.0],
        },
        SubtopicRecord {
            id: "2".to_string(),
            name: "Mitosis".to_string(),
            text: "Cell division".to_string(),
            topic_id: "11".to_string(),
            embedding: vec![0.9, 0.1],
        },
    ]));

    let (status, body) = post_json(
        app_with(settings_for(&server), vectors),
        "/chat/query_subtopics",
        json!({"query": "cell division", "top_n": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Mitosis");
    assert_eq!(results[0]["topicId"], "11");
    assert!(results[0]["similarity"].as_f64().unwrap() < -0.89);
}

#[tokio::test]
async fn test_biolinks_extract_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_string_contains("Heart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding(&[1.0, 0.0])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding(&[0.0, 1.0])))
        .mount(&server)
        .await;

    let mut page = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
    write!(
        page,
        r#"<ul>
            <li class="gallery-cards__item"><a role="button" aria-label="Heart" href="/widget/heart">Heart</a></li>
            <li class="gallery-cards__item"><a role="button" aria-label="Lung" href="/widget/lung">Lung</a></li>
        </ul>"#
    )
    .unwrap();

    let vectors = Arc::new(InMemoryVectorStore::new());
    let app = app_with(settings_for(&server), vectors.clone());

    let (status, body) = post_json(
        app.clone(),
        "/biolinks/extract",
        json!({"file_path": page.path().to_str().unwrap()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Inserted 2 records."}));
    assert_eq!(vectors.biolink_count(), 2);

    let (status, body) = post_json(app, "/biolinks/search", json!({"query_text": "Heart"})).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "Heart");
    assert_eq!(results[0]["href"], "https://human.biodigital.com/widget/heart");
}

#[tokio::test]
async fn test_biolinks_missing_file_is_server_error() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        app(&server),
        "/biolinks/extract",
        json!({"file_path": "/nonexistent/gallery.html"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("IO error"));
}
