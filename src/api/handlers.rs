//! HTTP request handlers for content generation, retrieval and health

use crate::api::models::{
    AgentResultResponse, BiolinksExtractRequest, BiolinksSearchRequest, BiolinksSearchResponse,
    BookRequest, ContentRequest, ExplanationsResponse, HealthResponse, MessageResponse,
    QuestionsRequest, QuestionsResponse, SubtopicQueryRequest, SubtopicQueryResponse,
    SubtopicsData, SubtopicsRequest, TopicsResponse, VectorizeRequest, VectorizeResponse,
};
use crate::content::{BookToc, CourseContent};
use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// Extract lecture topics from a course schedule
pub async fn extract_topics(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<TopicsResponse>, AppError> {
    info!(content_len = request.content.len(), "Received topic extraction request");

    let topics = state.content.extract_topics(&request.content).await?;

    Ok(Json(TopicsResponse { topics }))
}

/// Extract subtopics for each topic
pub async fn extract_subtopics(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubtopicsRequest>,
) -> Result<Json<SubtopicsData>, AppError> {
    info!(topics = request.topics.len(), "Received subtopic extraction request");

    let data = state.content.extract_subtopics(&request.topics).await?;

    Ok(Json(SubtopicsData { data }))
}

/// Explain every subtopic
pub async fn generate_explanations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubtopicsData>,
) -> Result<Json<ExplanationsResponse>, AppError> {
    info!(topics = request.data.len(), "Received explanation request");

    let explanations = state.content.generate_explanations(&request.data).await?;

    info!(explanations = explanations.len(), "Explanations generated");
    Ok(Json(ExplanationsResponse { explanations }))
}

/// Generate questions for every subtopic, difficulty and question type
pub async fn generate_questions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    info!(
        topics = request.data.len(),
        explanations = request.explanations.len(),
        "Received question generation request"
    );

    let questions = state
        .content
        .generate_questions(&request.data, &request.explanations)
        .await?;

    info!(questions = questions.len(), "Questions generated");
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn book_toc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookRequest>,
) -> Result<Json<BookToc>, AppError> {
    info!(title = %request.title, "Received book table of contents request");

    let toc = state.content.extract_book_toc(&request.title).await?;

    Ok(Json(toc))
}

pub async fn extract_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<CourseContent>, AppError> {
    info!(content_len = request.content.len(), "Received course extraction request");

    let course = state.content.extract_course_content(&request.content).await?;

    Ok(Json(course))
}

/// Embed a text
pub async fn vectorize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VectorizeRequest>,
) -> Result<Json<VectorizeResponse>, AppError> {
    let embedding = state.embedder.embed(&request.text).await?;

    Ok(Json(VectorizeResponse { embedding }))
}

/// Similarity search over stored subtopics
pub async fn query_subtopics(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubtopicQueryRequest>,
) -> Result<Json<SubtopicQueryResponse>, AppError> {
    info!(query = %request.query, top_n = request.top_n, "Received subtopic query");

    let results = state.researcher.search(&request.query, request.top_n).await?;

    Ok(Json(SubtopicQueryResponse { results }))
}

/// Answer a question with the subtopic research agent
pub async fn query_subtopics_agent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubtopicQueryRequest>,
) -> Result<Json<AgentResultResponse>, AppError> {
    info!(query = %request.query, "Received subtopic agent query");

    let result = state.researcher.answer(&request.query, request.top_n).await?;

    Ok(Json(AgentResultResponse { result }))
}

/// Extract biolinks from a saved gallery page and store them
pub async fn extract_biolinks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BiolinksExtractRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    info!(file_path = %request.file_path, "Received biolinks extraction request");

    let inserted = state.biolinks.ingest_file(&request.file_path).await?;

    Ok(Json(MessageResponse {
        message: format!("Inserted {} records.", inserted),
    }))
}

pub async fn search_biolinks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BiolinksSearchRequest>,
) -> Result<Json<BiolinksSearchResponse>, AppError> {
    let results = state
        .biolinks
        .search(&request.query_text, request.top_n)
        .await?;

    Ok(Json(BiolinksSearchResponse { results }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, database) = match state.chat_store.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            warn!(error = %e, "Chat store ping failed");
            ("degraded", "unavailable")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
