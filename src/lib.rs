//! ExoLab Agents
//!
//! HTTP service orchestrating hosted LLM, image and video APIs to generate
//! lecture content, hold multi-turn chats with summary memory, answer
//! questions over vector-indexed course material, and produce media.

pub mod agent;
pub mod api;
pub mod backend;
pub mod chat;
pub mod config;
pub mod content;
pub mod error;
pub mod media;
pub mod retrieval;

pub use error::{AppError, Result};

use std::sync::Arc;

use agent::catalog::CONVERSATION_SUMMARIZER;
use agent::Runner;
use backend::{
    ImageBackend, LlmBackend, LumaBackend, OpenAICompatibleBackend, Throttle, ThrottledImages,
    ThrottledLlm, ThrottledVideos, VideoBackend,
};
use chat::{ChatService, ChatStore, SummaryMemory};
use config::Settings;
use content::ContentGenerator;
use media::{DiagramService, ImageService, VideoService};
use retrieval::{BiolinkIndex, Embedder, SubtopicResearcher, VectorStore};

/// Hosted API clients, each behind the shared outbound throttle
pub struct Providers {
    pub llm: Arc<dyn LlmBackend>,
    pub images: Arc<dyn ImageBackend>,
    pub videos: Arc<dyn VideoBackend>,
}

impl Providers {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let throttle = Arc::new(Throttle::from_config(&settings.rate_limit));
        let openai = Arc::new(OpenAICompatibleBackend::new("openai", &settings.openai)?);
        let luma = Arc::new(LumaBackend::new(&settings.luma.provider)?);

        Ok(Self {
            llm: Arc::new(ThrottledLlm::new(openai.clone(), throttle.clone())),
            images: Arc::new(ThrottledImages::new(openai, throttle.clone())),
            videos: Arc::new(ThrottledVideos::new(luma, throttle)),
        })
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub chat_store: Arc<dyn ChatStore>,
    pub content: Arc<ContentGenerator>,
    pub chat: Arc<ChatService>,
    pub embedder: Arc<Embedder>,
    pub researcher: Arc<SubtopicResearcher>,
    pub biolinks: Arc<BiolinkIndex>,
    pub images: Arc<ImageService>,
    pub videos: Arc<VideoService>,
    pub diagrams: Arc<DiagramService>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        providers: Providers,
        chat_store: Arc<dyn ChatStore>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        let mut overrides = settings.models.overrides.clone();
        overrides
            .entry(CONVERSATION_SUMMARIZER.name.to_lowercase())
            .or_insert_with(|| settings.chat.summary_model.clone());

        let runner = Arc::new(Runner::new(providers.llm.clone(), overrides));
        let embedder = Arc::new(Embedder::new(
            providers.llm.clone(),
            settings.embeddings.model.clone(),
        ));
        let memory = Arc::new(SummaryMemory::new(
            runner.clone(),
            settings.chat.summary_token_limit,
        ));

        let diagram_rate = settings.diagrams.requests_per_minute;
        let diagram_throttle = Arc::new(Throttle::per_minute(diagram_rate, diagram_rate));

        Self {
            content: Arc::new(ContentGenerator::new(
                runner.clone(),
                settings.generation.max_concurrency,
            )),
            chat: Arc::new(ChatService::new(
                runner.clone(),
                chat_store.clone(),
                memory,
                &settings.chat,
            )),
            researcher: Arc::new(SubtopicResearcher::new(
                runner.clone(),
                embedder.clone(),
                vector_store.clone(),
                settings.chat.tool_max_steps,
            )),
            biolinks: Arc::new(BiolinkIndex::new(embedder.clone(), vector_store)),
            images: Arc::new(ImageService::new(providers.images, runner.clone(), &settings.images)),
            videos: Arc::new(VideoService::new(providers.videos, &settings.luma)),
            diagrams: Arc::new(DiagramService::new(runner, diagram_throttle)),
            embedder,
            chat_store,
            settings: Arc::new(settings),
        }
    }
}
