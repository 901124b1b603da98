//! Provider traits at the seam between services and hosted APIs

use async_trait::async_trait;

use crate::backend::text_backend::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};
use crate::backend::video_backend::{Generation, VideoGenerationRequest};
use crate::error::Result;

/// Hosted LLM runtime: chat completions and embeddings
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Chat completion
    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse>;

    /// Embed a single input text
    async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>>;
}

/// Hosted image generation API
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate_image(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse>;
}

/// Hosted asynchronous video generation API
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Submit a generation job
    async fn create_generation(&self, request: VideoGenerationRequest) -> Result<Generation>;

    /// Fetch the current state of a generation job
    async fn get_generation(&self, id: &str) -> Result<Generation>;
}
