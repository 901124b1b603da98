//! Embeddings and vector similarity retrieval

pub mod biolinks;
pub mod store;
pub mod subtopics;

use std::sync::Arc;
use tracing::debug;

use crate::backend::LlmBackend;
use crate::error::Result;

pub use biolinks::{extract_gallery_cards, BiolinkIndex, GalleryCard};
pub use store::{
    Biolink, BiolinkMatch, InMemoryVectorStore, PgVectorStore, SubtopicMatch, SubtopicRecord,
    VectorStore,
};
pub use subtopics::SubtopicResearcher;

/// Embeds text with the configured embeddings model
pub struct Embedder {
    backend: Arc<dyn LlmBackend>,
    model: String,
}

impl Embedder {
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.backend.embed(&self.model, text).await?;
        debug!(model = %self.model, dimensions = embedding.len(), "Embedded text");
        Ok(embedding)
    }
}
