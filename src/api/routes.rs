//! HTTP route definitions

use crate::api::{chat_handlers, handlers, media_handlers};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let request_timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    // Lecture content
    let content_routes = Router::new()
        .route("/topics/extract", post(handlers::extract_topics))
        .route("/subtopics/extract", post(handlers::extract_subtopics))
        .route("/explanations/generate", post(handlers::generate_explanations))
        .route("/questions/generate", post(handlers::generate_questions))
        .route("/books/toc", post(handlers::book_toc))
        .route("/courses/extract", post(handlers::extract_course));

    // Chat sessions and retrieval
    let chat_routes = Router::new()
        .route("/chat", post(chat_handlers::stateless_chat))
        .route("/chat/getmessages", post(chat_handlers::session_contents))
        .route("/chat/create", post(chat_handlers::create_chat))
        .route("/chat/message", post(chat_handlers::chat_message))
        .route("/chat/messages", get(chat_handlers::session_history))
        .route("/chat/query_subtopics", post(handlers::query_subtopics))
        .route("/chat/query_subtopics_agent", post(handlers::query_subtopics_agent))
        .route("/newchat/create", post(chat_handlers::create_transcript_chat))
        .route("/newchat/message", post(chat_handlers::transcript_chat_message))
        .route("/vectorize", post(handlers::vectorize))
        .route("/biolinks/extract", post(handlers::extract_biolinks))
        .route("/biolinks/search", post(handlers::search_biolinks));

    // Images, videos and diagrams
    let media_routes = Router::new()
        .route("/images/generate", post(media_handlers::generate_image))
        .route("/images/search", post(media_handlers::search_image))
        .route("/videos/generate", post(media_handlers::generate_video))
        .route("/diagram/generate", post(media_handlers::generate_diagram));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(content_routes)
        .merge(chat_routes)
        .merge(media_routes)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
