//! API request and response models

use serde::{Deserialize, Serialize};

use crate::chat::ChatTurn;
use crate::content::{LectureSubtopics, Question, SubtopicExplanation};
use crate::retrieval::{BiolinkMatch, SubtopicMatch};

fn default_top_n() -> usize {
    3
}

// ---- content ----

/// Course schedule text
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtopicsRequest {
    pub topics: Vec<String>,
}

/// Topics with their subtopics; request body of explanation generation
/// and response body of subtopic extraction
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtopicsData {
    pub data: Vec<LectureSubtopics>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplanationsResponse {
    pub explanations: Vec<SubtopicExplanation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionsRequest {
    pub data: Vec<LectureSubtopics>,
    #[serde(default)]
    pub explanations: Vec<SubtopicExplanation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookRequest {
    pub title: String,
}

// ---- retrieval ----

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorizeRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorizeResponse {
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtopicQueryRequest {
    pub query: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubtopicQueryResponse {
    pub results: Vec<SubtopicMatch>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentResultResponse {
    pub result: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BiolinksExtractRequest {
    pub file_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BiolinksSearchRequest {
    pub query_text: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BiolinksSearchResponse {
    pub results: Vec<BiolinkMatch>,
}

// ---- chat ----

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatelessChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub user_message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatelessChatResponse {
    pub response: ChatTurn,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatCreateRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub message: String,
}

/// Reply plus the contents of the whole session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatReplyResponse {
    pub session_id: String,
    pub reply: String,
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionContentsResponse {
    pub session_id: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionHistoryResponse {
    pub session_id: String,
    pub history: Vec<HistoryEntry>,
}

// ---- media ----

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageResponse {
    pub image_url: String,
}

/// Video generation request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoRequest {
    pub prompt: String,

    #[serde(default = "default_video_model")]
    pub model: String,

    /// "540p", "720p", "1080p" or "4k"
    #[serde(default = "default_resolution")]
    pub resolution: String,

    #[serde(default = "default_duration")]
    pub duration: String,

    #[serde(default, rename = "loop")]
    pub looped: bool,
}

fn default_video_model() -> String {
    "ray-2".to_string()
}

fn default_resolution() -> String {
    "720p".to_string()
}

fn default_duration() -> String {
    "5s".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoResponse {
    pub video_url: String,
}

// ---- health ----

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
