//! Topic and subtopic extraction

use serde::Deserialize;
use tracing::info;

use super::fanout::fan_out;
use super::{ContentGenerator, CourseContent, LectureSubtopics};
use crate::agent::catalog::{COURSE_CONTENT_EXTRACTOR, COURSE_SCHEDULE_EXTRACTOR, SUBTOPICS_EXTRACTOR};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct LectureTopics {
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractedSubtopics {
    #[serde(default)]
    subtopics: Vec<String>,
}

impl ContentGenerator {
    /// Extract lecture topics from a course schedule
    pub async fn extract_topics(&self, content: &str) -> Result<Vec<String>> {
        let output: LectureTopics = self
            .runner
            .run_json(&COURSE_SCHEDULE_EXTRACTOR, content)
            .await?;

        info!(topics = output.topics.len(), "Extracted lecture topics");
        Ok(output.topics)
    }

    /// Extract subtopics for every topic, one call per topic
    pub async fn extract_subtopics(&self, topics: &[String]) -> Result<Vec<LectureSubtopics>> {
        fan_out(topics.to_vec(), self.max_concurrency, |topic| async move {
            let output: ExtractedSubtopics = self.runner.run_json(&SUBTOPICS_EXTRACTOR, &topic).await?;
            Ok(LectureSubtopics {
                topic,
                subtopics: output.subtopics,
            })
        })
        .await
    }

    /// Extract topics, description and reading list from a course schedule
    pub async fn extract_course_content(&self, content: &str) -> Result<CourseContent> {
        self.runner.run_json(&COURSE_CONTENT_EXTRACTOR, content).await
    }
}
