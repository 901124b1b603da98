//! Axodraw diagram generation

use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::agent::catalog::AXODRAW_DIAGRAM_GENERATOR;
use crate::agent::{strip_code_fence, Runner};
use crate::backend::Throttle;
use crate::error::{AppError, Result};

static DIAGRAM_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%%\s*Diagram Size:\s*([\d.]+)\s*x\s*([\d.]+)").expect("Invalid regex pattern")
});

/// LaTeX document with the diagram's declared size
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Diagram {
    pub document_content: String,
    pub diagram_width: f64,
    pub diagram_height: f64,
}

/// Read the `%% Diagram Size: W x H` comment from generated LaTeX
pub fn parse_diagram(output: &str) -> Result<Diagram> {
    let document = strip_code_fence(output).trim();

    let not_found = || AppError::Agent("Diagram size comment not found in the output.".to_string());
    let captures = DIAGRAM_SIZE.captures(document).ok_or_else(not_found)?;

    let dimension = |index: usize| -> Result<f64> {
        captures[index]
            .parse::<f64>()
            .map_err(|e| AppError::Agent(format!("Invalid diagram size {}: {}", &captures[index], e)))
    };

    Ok(Diagram {
        document_content: document.to_string(),
        diagram_width: dimension(1)?,
        diagram_height: dimension(2)?,
    })
}

pub struct DiagramService {
    runner: Arc<Runner>,
    throttle: Arc<Throttle>,
}

impl DiagramService {
    pub fn new(runner: Arc<Runner>, throttle: Arc<Throttle>) -> Self {
        Self { runner, throttle }
    }

    pub async fn generate(&self, prompt: &str) -> Result<Diagram> {
        self.throttle.acquire().await;

        let output = self
            .runner
            .run_text(&AXODRAW_DIAGRAM_GENERATOR, &format!("Prompt: {}", prompt))
            .await?;
        let diagram = parse_diagram(&output)?;

        info!(
            width = diagram.diagram_width,
            height = diagram.diagram_height,
            "Diagram generated"
        );
        Ok(diagram)
    }
}
