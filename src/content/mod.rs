//! Lecture content generation: topics, subtopics, explanations, questions

pub mod explanations;
pub mod fanout;
pub mod questions;
pub mod resources;
pub mod topics;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agent::Runner;

pub use questions::{Difficulty, QuestionType};

/// A lecture topic with its subtopics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LectureSubtopics {
    pub topic: String,
    pub subtopics: Vec<String>,
}

/// Markdown explanation of one subtopic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtopicExplanation {
    pub topic: String,
    pub subtopic: String,
    pub explanation: String,
}

/// Generated quiz question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub topic: String,
    pub subtopic: String,
    pub difficulty: String,
    pub question_type: String,
    pub question: String,
    /// Options for multiple choice, empty otherwise
    #[serde(default)]
    pub answers: Vec<String>,
    /// Empty for open answer questions
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// Table of contents found for a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookToc {
    pub book: String,
    #[serde(default)]
    pub table_of_contents: Vec<String>,
}

/// Summary of a course schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseContent {
    pub topics: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reading_materials: Vec<String>,
}

/// Generates lecture content through the agent runner
pub struct ContentGenerator {
    runner: Arc<Runner>,
    max_concurrency: usize,
}

impl ContentGenerator {
    pub fn new(runner: Arc<Runner>, max_concurrency: usize) -> Self {
        Self {
            runner,
            max_concurrency,
        }
    }
}
