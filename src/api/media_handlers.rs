//! Media generation handlers

use crate::api::models::{ImageResponse, PromptRequest, VideoRequest, VideoResponse};
use crate::backend::VideoGenerationRequest;
use crate::error::AppError;
use crate::media::Diagram;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

/// Generate a scientific 3D rendering
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    info!(prompt = %request.prompt, "Received image generation request");

    let image_url = state.images.generate(&request.prompt).await?;

    Ok(Json(ImageResponse { image_url }))
}

/// Search the web for a matching image
pub async fn search_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    info!(prompt = %request.prompt, "Received image search request");

    let image_url = state.images.search(&request.prompt).await?;

    Ok(Json(ImageResponse { image_url }))
}

/// Generate a video and wait for it to finish
pub async fn generate_video(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoResponse>, AppError> {
    info!(
        prompt = %request.prompt,
        model = %request.model,
        resolution = %request.resolution,
        duration = %request.duration,
        "Received video generation request"
    );

    let video_url = state
        .videos
        .generate(VideoGenerationRequest {
            prompt: request.prompt,
            model: request.model,
            resolution: request.resolution,
            duration: request.duration,
            looped: request.looped,
        })
        .await?;

    Ok(Json(VideoResponse { video_url }))
}

/// Generate an axodraw LaTeX diagram
pub async fn generate_diagram(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<Diagram>, AppError> {
    info!(prompt = %request.prompt, "Received diagram generation request");

    let diagram = state.diagrams.generate(&request.prompt).await?;

    Ok(Json(diagram))
}
