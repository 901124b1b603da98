//! Video generation with status polling

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::backend::{GenerationState, VideoBackend, VideoGenerationRequest};
use crate::config::LumaConfig;
use crate::error::{AppError, Result};

pub struct VideoService {
    backend: Arc<dyn VideoBackend>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl VideoService {
    pub fn new(backend: Arc<dyn VideoBackend>, config: &LumaConfig) -> Self {
        Self {
            backend,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: config.max_poll_attempts,
        }
    }

    /// Submit a generation and wait until its video is ready
    pub async fn generate(&self, request: VideoGenerationRequest) -> Result<String> {
        let generation = self.backend.create_generation(request).await?;
        let id = generation.id;

        info!(generation_id = %id, "Video generation submitted");

        for attempt in 1..=self.max_poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let generation = self.backend.get_generation(&id).await?;
            debug!(generation_id = %id, attempt, state = ?generation.state, "Polled video generation");

            match generation.state {
                GenerationState::Completed => {
                    let url = generation
                        .assets
                        .and_then(|assets| assets.video)
                        .ok_or_else(|| {
                            AppError::BackendError(format!("Generation {} completed without a video", id))
                        })?;

                    info!(generation_id = %id, attempts = attempt, "Video generation completed");
                    return Ok(url);
                }
                GenerationState::Failed => {
                    let reason = generation
                        .failure_reason
                        .unwrap_or_else(|| "unknown reason".to_string());
                    return Err(AppError::GenerationFailed(reason));
                }
                _ => {}
            }
        }

        Err(AppError::GenerationFailed(format!(
            "generation {} still pending after {} polls",
            id, self.max_poll_attempts
        )))
    }
}
