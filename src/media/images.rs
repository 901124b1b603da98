//! Image generation and web image search

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::agent::catalog::IMAGE_SEARCHER;
use crate::agent::Runner;
use crate::backend::{ImageBackend, ImageGenerationRequest};
use crate::config::ImagesConfig;
use crate::error::{AppError, Result};

const RENDER_DIRECTIVE: &str = "Render as a realistic 3D image suitable for scientific visualization.";

#[derive(Debug, Deserialize)]
struct ImageSearchOutput {
    image_url: String,
}

/// Description of the host the service runs on
pub fn host_info() -> String {
    format!(
        "System: {}, Family: {}, Processor: {}",
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH
    )
}

/// User prompt enriched with host details and the rendering directive
pub fn enriched_prompt(prompt: &str) -> String {
    format!("{}. {}. {}", prompt, host_info(), RENDER_DIRECTIVE)
}

pub struct ImageService {
    backend: Arc<dyn ImageBackend>,
    runner: Arc<Runner>,
    model: String,
    size: String,
}

impl ImageService {
    pub fn new(backend: Arc<dyn ImageBackend>, runner: Arc<Runner>, config: &ImagesConfig) -> Self {
        Self {
            backend,
            runner,
            model: config.model.clone(),
            size: config.size.clone(),
        }
    }

    /// Generate one image and return its URL
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: enriched_prompt(prompt),
            n: 1,
            size: self.size.clone(),
        };

        let response = self.backend.generate_image(request).await?;
        let url = response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| AppError::BackendError("Image backend returned no image URL".to_string()))?;

        info!(model = %self.model, size = %self.size, "Image generated");
        Ok(url)
    }

    /// Find an existing image on the web matching the description
    pub async fn search(&self, prompt: &str) -> Result<String> {
        let output: ImageSearchOutput = self.runner.run_json(&IMAGE_SEARCHER, prompt).await?;
        Ok(output.image_url)
    }
}
