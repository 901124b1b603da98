//! Subtopic explanations

use serde::Deserialize;

use super::fanout::fan_out;
use super::{ContentGenerator, LectureSubtopics, SubtopicExplanation};
use crate::agent::catalog::SUBTOPIC_EXPLAINER;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct ExplanationOutput {
    explanation: String,
}

/// Prompt for explaining one subtopic without covering its siblings
pub fn explanation_prompt(topic: &str, subtopic: &str, other_subtopics: &[String]) -> String {
    format!(
        "Topic: {}\nSubtopic: {}\nOther Subtopics: {}",
        topic,
        subtopic,
        other_subtopics.join(", ")
    )
}

impl ContentGenerator {
    /// Explain every subtopic of every item, one call per subtopic
    pub async fn generate_explanations(
        &self,
        items: &[LectureSubtopics],
    ) -> Result<Vec<SubtopicExplanation>> {
        let jobs: Vec<(String, String, String)> = items
            .iter()
            .flat_map(|item| {
                item.subtopics.iter().map(move |subtopic| {
                    let prompt = explanation_prompt(&item.topic, subtopic, &item.subtopics);
                    (item.topic.clone(), subtopic.clone(), prompt)
                })
            })
            .collect();

        fan_out(jobs, self.max_concurrency, |(topic, subtopic, prompt)| async move {
            let output: ExplanationOutput = self.runner.run_json(&SUBTOPIC_EXPLAINER, &prompt).await?;

            Ok(SubtopicExplanation {
                topic,
                subtopic,
                explanation: output.explanation,
            })
        })
        .await
    }
}
