//! Chat session handlers

use crate::api::models::{
    ChatCreateRequest, ChatMessageRequest, ChatReplyResponse, HistoryEntry, SessionContentsResponse,
    SessionHistoryResponse, SessionRequest, StatelessChatRequest, StatelessChatResponse,
};
use crate::chat::{parse_session_id, ChatExchange, PromptStyle};
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

fn reply_response(exchange: ChatExchange) -> Json<ChatReplyResponse> {
    Json(ChatReplyResponse {
        session_id: exchange.session_id.to_string(),
        reply: exchange.reply,
        history: exchange.history,
    })
}

async fn create(
    state: &AppState,
    request: ChatCreateRequest,
    style: PromptStyle,
) -> Result<Json<ChatReplyResponse>, AppError> {
    info!(style = ?style, "Received chat create request");

    let exchange = state.chat.create_session(&request.message, style).await?;

    Ok(reply_response(exchange))
}

async fn message(
    state: &AppState,
    request: ChatMessageRequest,
    style: PromptStyle,
) -> Result<Json<ChatReplyResponse>, AppError> {
    let session_id = parse_session_id(&request.session_id)?;
    info!(session_id = %session_id, style = ?style, "Received chat message");

    let exchange = state
        .chat
        .send_message(session_id, &request.message, style)
        .await?;

    Ok(reply_response(exchange))
}

/// Start a session; context is sent as role-tagged messages
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatCreateRequest>,
) -> Result<Json<ChatReplyResponse>, AppError> {
    create(&state, request, PromptStyle::Messages).await
}

pub async fn chat_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatMessageRequest>,
) -> Result<Json<ChatReplyResponse>, AppError> {
    message(&state, request, PromptStyle::Messages).await
}

/// Start a session; context is sent as a flattened transcript
pub async fn create_transcript_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatCreateRequest>,
) -> Result<Json<ChatReplyResponse>, AppError> {
    create(&state, request, PromptStyle::Transcript).await
}

pub async fn transcript_chat_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatMessageRequest>,
) -> Result<Json<ChatReplyResponse>, AppError> {
    message(&state, request, PromptStyle::Transcript).await
}

/// Stored messages with their roles
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SessionRequest>,
) -> Result<Json<SessionHistoryResponse>, AppError> {
    let session_id = parse_session_id(&request.session_id)?;

    let history = state
        .chat
        .history(session_id)
        .await?
        .into_iter()
        .map(|m| HistoryEntry {
            role: m.role.api_label().to_string(),
            content: m.content,
        })
        .collect();

    Ok(Json(SessionHistoryResponse {
        session_id: request.session_id,
        history,
    }))
}

/// Stored message contents only
pub async fn session_contents(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionContentsResponse>, AppError> {
    let session_id = parse_session_id(&request.session_id)?;

    let messages = state.chat.contents(session_id).await?;

    Ok(Json(SessionContentsResponse {
        session_id: request.session_id,
        messages,
    }))
}

/// Chat over a history held by the client
pub async fn stateless_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatelessChatRequest>,
) -> Result<Json<StatelessChatResponse>, AppError> {
    info!(history = request.history.len(), "Received stateless chat request");

    let response = state
        .chat
        .chat(&request.history, &request.user_message)
        .await?;

    Ok(Json(StatelessChatResponse { response }))
}
