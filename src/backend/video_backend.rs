//! Luma Dream Machine backend for asynchronous video generation

use async_trait::async_trait;
use reqwest::{Client, header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE}};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::backend::traits::VideoBackend;
use crate::config::ProviderConfig;
use crate::error::{AppError, Result};

/// Video generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    pub model: String,
    pub resolution: String,
    pub duration: String,
    #[serde(rename = "loop")]
    pub looped: bool,
}

/// Lifecycle of a generation job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Queued,
    Dreaming,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Generated assets
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationAssets {
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Generation job record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub id: String,
    pub state: GenerationState,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub assets: Option<GenerationAssets>,
}

/// Luma API backend
pub struct LumaBackend {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl LumaBackend {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.resolve_api_key(),
        })
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    async fn parse_generation(response: reqwest::Response) -> Result<Generation> {
        if response.status().is_success() {
            response
                .json::<Generation>()
                .await
                .map_err(|e| AppError::BackendError(format!("Failed to parse response: {}", e)))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::BackendError(format!(
                "Backend returned {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl VideoBackend for LumaBackend {
    async fn create_generation(&self, request: VideoGenerationRequest) -> Result<Generation> {
        debug!(model = %request.model, resolution = %request.resolution, "Creating video generation");

        let response = self
            .client
            .post(format!("{}/generations", self.base_url))
            .headers(self.get_headers())
            .json(&request)
            .send()
            .await?;

        Self::parse_generation(response).await
    }

    async fn get_generation(&self, id: &str) -> Result<Generation> {
        let response = self
            .client
            .get(format!("{}/generations/{}", self.base_url, id))
            .headers(self.get_headers())
            .send()
            .await?;

        Self::parse_generation(response).await
    }
}
