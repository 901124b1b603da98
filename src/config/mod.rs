//! Configuration module

pub mod settings;

pub use settings::{
    parse_size, ChatConfig, DatabaseConfig, DiagramsConfig, EmbeddingsConfig, GenerationConfig,
    ImagesConfig, LoggingConfig, LumaConfig, ModelsConfig, ProviderConfig, RateLimitConfig,
    ServerConfig, Settings,
};
