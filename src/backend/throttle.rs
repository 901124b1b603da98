//! Outbound rate limiting for provider calls

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::backend::text_backend::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};
use crate::backend::traits::{ImageBackend, LlmBackend, VideoBackend};
use crate::backend::video_backend::{Generation, VideoGenerationRequest};
use crate::config::RateLimitConfig;
use crate::error::Result;

/// Token bucket shared by every call through one provider
pub struct Throttle {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl Throttle {
    /// Allow `per_minute` calls with bursts of up to `burst`
    pub fn per_minute(per_minute: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Some(RateLimiter::direct(Quota::per_minute(rate).allow_burst(burst))),
        }
    }

    /// Never waits
    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        if config.enabled {
            Self::per_minute(config.requests_per_minute, config.burst_size)
        } else {
            Self::unlimited()
        }
    }

    /// Wait until a call is permitted
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

/// LLM backend that waits on a throttle before each call
pub struct ThrottledLlm {
    inner: Arc<dyn LlmBackend>,
    throttle: Arc<Throttle>,
}

impl ThrottledLlm {
    pub fn new(inner: Arc<dyn LlmBackend>, throttle: Arc<Throttle>) -> Self {
        Self { inner, throttle }
    }
}

#[async_trait]
impl LlmBackend for ThrottledLlm {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        self.throttle.acquire().await;
        self.inner.chat_completion(request).await
    }

    async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>> {
        self.throttle.acquire().await;
        self.inner.embed(model, input).await
    }
}

/// Image backend that waits on a throttle before each call
pub struct ThrottledImages {
    inner: Arc<dyn ImageBackend>,
    throttle: Arc<Throttle>,
}

impl ThrottledImages {
    pub fn new(inner: Arc<dyn ImageBackend>, throttle: Arc<Throttle>) -> Self {
        Self { inner, throttle }
    }
}

#[async_trait]
impl ImageBackend for ThrottledImages {
    async fn generate_image(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        self.throttle.acquire().await;
        self.inner.generate_image(request).await
    }
}

/// Video backend that waits on a throttle before each call
pub struct ThrottledVideos {
    inner: Arc<dyn VideoBackend>,
    throttle: Arc<Throttle>,
}

impl ThrottledVideos {
    pub fn new(inner: Arc<dyn VideoBackend>, throttle: Arc<Throttle>) -> Self {
        Self { inner, throttle }
    }
}

#[async_trait]
impl VideoBackend for ThrottledVideos {
    async fn create_generation(&self, request: VideoGenerationRequest) -> Result<Generation> {
        self.throttle.acquire().await;
        self.inner.create_generation(request).await
    }

    async fn get_generation(&self, id: &str) -> Result<Generation> {
        self.throttle.acquire().await;
        self.inner.get_generation(id).await
    }
}
