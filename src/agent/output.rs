//! Parsing of agent replies into typed outputs

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (```json, ```latex, ...)
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse a JSON object out of a model reply.
///
/// Accepts a bare JSON document, one wrapped in a code fence, or prose with
/// a single embedded object (the outermost `{...}` span is used).
pub fn parse_json_output<T: DeserializeOwned>(agent_name: &str, raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);

    let first_error = match serde_json::from_str::<T>(body) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<T>(&body[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AppError::Agent(format!(
        "{} returned output that does not match the expected schema: {}",
        agent_name, first_error
    )))
}
