//! Backend module - provider traits, HTTP clients, and outbound throttling

pub mod text_backend;
pub mod throttle;
pub mod traits;
pub mod video_backend;

pub use text_backend::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, FunctionCall,
    ImageData, ImageGenerationRequest, ImageGenerationResponse, OpenAICompatibleBackend,
    ResponseFormat, Tool, ToolCall, Usage,
};
pub use throttle::{Throttle, ThrottledImages, ThrottledLlm, ThrottledVideos};
pub use traits::{ImageBackend, LlmBackend, VideoBackend};
pub use video_backend::{Generation, GenerationAssets, GenerationState, LumaBackend, VideoGenerationRequest};
