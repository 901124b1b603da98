//! Question generation across difficulty and question type

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use super::fanout::fan_out;
use super::{ContentGenerator, LectureSubtopics, Question, SubtopicExplanation};
use crate::agent::catalog::QUESTION_GENERATOR;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "Open Answer")]
    OpenAnswer,
}

impl QuestionType {
    pub const ALL: [QuestionType; 2] = [QuestionType::MultipleChoice, QuestionType::OpenAnswer];
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::OpenAnswer => "Open Answer",
        };
        f.write_str(label)
    }
}

/// One question to generate
struct QuestionJob {
    topic: String,
    subtopic: String,
    explanation: String,
    others: Vec<String>,
    difficulty: Difficulty,
    question_type: QuestionType,
}

impl QuestionJob {
    fn prompt(&self) -> String {
        format!(
            "Topic: {}\nSubtopic: {}\nExplanation: {}\nOther Subtopics: {}\nDifficulty: {}\nQuestion Type: {}",
            self.topic,
            self.subtopic,
            self.explanation,
            self.others.join(", "),
            self.difficulty,
            self.question_type
        )
    }
}

/// Every (subtopic, difficulty, question type) combination, in request order
fn question_jobs(items: &[LectureSubtopics], explanations: &[SubtopicExplanation]) -> Vec<QuestionJob> {
    let lookup: HashMap<(&str, &str), &str> = explanations
        .iter()
        .map(|e| ((e.topic.as_str(), e.subtopic.as_str()), e.explanation.as_str()))
        .collect();

    let mut jobs = Vec::new();
    for item in items {
        for subtopic in &item.subtopics {
            let explanation = match lookup.get(&(item.topic.as_str(), subtopic.as_str())) {
                Some(text) => *text,
                None => {
                    warn!(topic = %item.topic, subtopic = %subtopic, "No explanation for subtopic");
                    ""
                }
            };

            for difficulty in Difficulty::ALL {
                for question_type in QuestionType::ALL {
                    jobs.push(QuestionJob {
                        topic: item.topic.clone(),
                        subtopic: subtopic.clone(),
                        explanation: explanation.to_string(),
                        others: item.subtopics.clone(),
                        difficulty,
                        question_type,
                    });
                }
            }
        }
    }

    jobs
}

/// Pin the identifying fields to what was requested and blank the answer
/// fields of open answer questions.
pub fn normalize_question(
    mut question: Question,
    topic: &str,
    subtopic: &str,
    difficulty: Difficulty,
    question_type: QuestionType,
) -> Question {
    question.topic = topic.to_string();
    question.subtopic = subtopic.to_string();
    question.difficulty = difficulty.to_string();
    question.question_type = question_type.to_string();

    if question_type == QuestionType::OpenAnswer {
        question.answers.clear();
        question.correct_answer.clear();
    }

    question
}

impl ContentGenerator {
    /// Generate one question per (subtopic, difficulty, question type).
    ///
    /// Explanations are matched by (topic, subtopic); a subtopic without one
    /// is still questioned with an empty explanation.
    pub async fn generate_questions(
        &self,
        items: &[LectureSubtopics],
        explanations: &[SubtopicExplanation],
    ) -> Result<Vec<Question>> {
        let jobs = question_jobs(items, explanations);

        info!(questions = jobs.len(), "Generating questions");

        fan_out(jobs, self.max_concurrency, |job| async move {
            let question: Question = self.runner.run_json(&QUESTION_GENERATOR, &job.prompt()).await?;
            Ok(normalize_question(
                question,
                &job.topic,
                &job.subtopic,
                job.difficulty,
                job.question_type,
            ))
        })
        .await
    }
}
