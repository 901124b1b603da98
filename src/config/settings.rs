//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub database: DatabaseConfig,
    pub openai: ProviderConfig,
    pub luma: LumaConfig,
    pub generation: GenerationConfig,
    pub chat: ChatConfig,
    pub images: ImagesConfig,
    pub embeddings: EmbeddingsConfig,
    pub diagrams: DiagramsConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// Question fan-out and video polling can take minutes.
fn default_request_timeout() -> u64 {
    900
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Outbound rate limiting applied to every provider call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rpm")]
    pub requests_per_minute: u32,
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_true() -> bool {
    true
}

fn default_rpm() -> u32 {
    600
}

fn default_burst() -> u32 {
    60
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual fields
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_name")]
    pub user: String,
    #[serde(default = "default_db_name")]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    6024
}

fn default_db_name() -> String {
    "langchain".to_string()
}

fn default_max_connections() -> u32 {
    30
}

impl DatabaseConfig {
    /// Connection URL for the pool
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

/// Hosted provider endpoint and credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Inline API key, used when `api_key_env` is unset or empty
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    120_000
}

impl ProviderConfig {
    /// Resolve the API key from the environment first, then inline config
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

/// Luma video provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LumaConfig {
    #[serde(flatten)]
    pub provider: ProviderConfig,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_poll_interval() -> u64 {
    3000
}

fn default_max_poll_attempts() -> u32 {
    200
}

/// Batch generation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    16
}

/// Chat memory settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_recent_messages")]
    pub recent_messages: usize,
    #[serde(default = "default_summary_token_limit")]
    pub summary_token_limit: usize,
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_tool_max_steps")]
    pub tool_max_steps: usize,
}

fn default_recent_messages() -> usize {
    5
}

fn default_summary_token_limit() -> usize {
    2000
}

fn default_summary_model() -> String {
    "gpt-4o".to_string()
}

fn default_welcome_message() -> String {
    "Welcome to the chat!".to_string()
}

fn default_tool_max_steps() -> usize {
    5
}

/// Image generation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

/// Embedding settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

/// Diagram generation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiagramsConfig {
    #[serde(default = "default_diagram_rpm")]
    pub requests_per_minute: u32,
}

fn default_diagram_rpm() -> u32 {
    60
}

/// Per-agent model overrides, keyed by agent name
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ModelsConfig {
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/exolab.yaml")
    }

    /// Load settings from a specific configuration file path (YAML or TOML)
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.request_timeout_secs", default_request_timeout() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.requests_per_minute", default_rpm() as i64)?
            .set_default("rate_limit.burst_size", default_burst() as i64)?
            .set_default("database.host", default_db_host())?
            .set_default("database.port", default_db_port() as i64)?
            .set_default("database.user", default_db_name())?
            .set_default("database.password", default_db_name())?
            .set_default("database.name", default_db_name())?
            .set_default("database.max_connections", default_max_connections() as i64)?
            .set_default("openai.base_url", "https://api.openai.com/v1")?
            .set_default("openai.api_key_env", "OPENAI_API_KEY")?
            .set_default("openai.timeout_ms", default_timeout() as i64)?
            .set_default("luma.base_url", "https://api.lumalabs.ai/dream-machine/v1")?
            .set_default("luma.api_key_env", "LUMA_API_KEY")?
            .set_default("luma.timeout_ms", default_timeout() as i64)?
            .set_default("luma.poll_interval_ms", default_poll_interval() as i64)?
            .set_default("luma.max_poll_attempts", default_max_poll_attempts() as i64)?
            .set_default("generation.max_concurrency", default_max_concurrency() as i64)?
            .set_default("chat.recent_messages", default_recent_messages() as i64)?
            .set_default("chat.summary_token_limit", default_summary_token_limit() as i64)?
            .set_default("chat.summary_model", default_summary_model())?
            .set_default("chat.welcome_message", default_welcome_message())?
            .set_default("chat.tool_max_steps", default_tool_max_steps() as i64)?
            .set_default("images.model", default_image_model())?
            .set_default("images.size", default_image_size())?
            .set_default("embeddings.model", default_embedding_model())?
            .set_default("diagrams.requests_per_minute", default_diagram_rpm() as i64)?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix("EXOLAB")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.rate_limit.requests_per_minute == 0 || self.rate_limit.burst_size == 0 {
            return Err(invalid("Rate limit and burst size must be greater than 0"));
        }

        if self.diagrams.requests_per_minute == 0 {
            return Err(invalid("Diagram rate limit must be greater than 0"));
        }

        if self.generation.max_concurrency == 0 {
            return Err(invalid("Generation concurrency must be greater than 0"));
        }

        if self.chat.recent_messages == 0 {
            return Err(invalid("Chat recent message window must be greater than 0"));
        }

        if self.chat.tool_max_steps == 0 {
            return Err(invalid("Tool step limit must be greater than 0"));
        }

        if parse_size(&self.images.size).is_none() {
            return Err(invalid(&format!(
                "Image size '{}' must look like WIDTHxHEIGHT",
                self.images.size
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}

/// Parse a `WIDTHxHEIGHT` size string
pub fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.split_once('x')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                requests_per_minute: default_rpm(),
                burst_size: default_burst(),
            },
            database: DatabaseConfig {
                url: None,
                host: default_db_host(),
                port: default_db_port(),
                user: default_db_name(),
                password: default_db_name(),
                name: default_db_name(),
                max_connections: default_max_connections(),
            },
            openai: ProviderConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: Some("OPENAI_API_KEY".to_string()),
                api_key: None,
                timeout_ms: default_timeout(),
            },
            luma: LumaConfig {
                provider: ProviderConfig {
                    base_url: "https://api.lumalabs.ai/dream-machine/v1".to_string(),
                    api_key_env: Some("LUMA_API_KEY".to_string()),
                    api_key: None,
                    timeout_ms: default_timeout(),
                },
                poll_interval_ms: default_poll_interval(),
                max_poll_attempts: default_max_poll_attempts(),
            },
            generation: GenerationConfig {
                max_concurrency: default_max_concurrency(),
            },
            chat: ChatConfig {
                recent_messages: default_recent_messages(),
                summary_token_limit: default_summary_token_limit(),
                summary_model: default_summary_model(),
                welcome_message: default_welcome_message(),
                tool_max_steps: default_tool_max_steps(),
            },
            images: ImagesConfig {
                model: default_image_model(),
                size: default_image_size(),
            },
            embeddings: EmbeddingsConfig {
                model: default_embedding_model(),
            },
            diagrams: DiagramsConfig {
                requests_per_minute: default_diagram_rpm(),
            },
            models: ModelsConfig::default(),
        }
    }
}
