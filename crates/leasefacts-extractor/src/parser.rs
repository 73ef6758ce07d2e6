//! Parse LLM output into a fact record

use crate::error::ExtractorError;
use leasefacts_domain::FactRecord;
use serde_json::Value;
use tracing::warn;

/// Parse an LLM JSON response into a fact record
///
/// The response must be a single flat JSON object. Unknown keys are dropped,
/// nulls become missing, numbers are taken in decimal form.
pub fn parse_llm_response(response: &str) -> Result<FactRecord, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;

    let object = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    if let Some((key, _)) = object
        .iter()
        .find(|(_, value)| value.is_object() || value.is_array())
    {
        return Err(ExtractorError::InvalidFormat(format!(
            "Nested value for key '{}'",
            key
        )));
    }

    let record = FactRecord::from_json_object(object);
    if record.is_empty() && !object.is_empty() {
        warn!("Model response had {} keys but no usable facts", object.len());
    }
    Ok(record)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence, and the closing one when present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
