use common::api::open_ai::{first_content, usage};
use common::errors::ReviewError;
use serde_json::Value;
use tracing::{debug, warn};

use super::schema::check_review;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Pulls `choices[0].message.content` out of the upstream envelope. The rest
/// of the envelope is not validated.
pub fn extract_content(envelope: &Value) -> Result<String, ReviewError> {
    if let Some(usage) = usage(envelope) {
        debug!(
            prompt_tokens = ?usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = ?usage.total_tokens,
            "upstream token usage"
        );
    }

    first_content(envelope)
        .map(str::to_string)
        .ok_or_else(|| ReviewError::UpstreamMalformed("completion has no message content".to_string()))
}

/// Removes one leading fence (```json or bare ```) and one trailing ```.
/// Surrounding whitespace is trimmed before and after.
pub fn strip_code_fences(content: &str) -> &str {
    let mut text = content.trim();
    if let Some(rest) = text.strip_prefix(JSON_FENCE) {
        text = rest;
    } else if let Some(rest) = text.strip_prefix(FENCE) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }
    text.trim()
}

/// Parses the model reply. Any JSON object is accepted and returned untouched;
/// schema mismatches are only logged.
pub fn parse_review(content: &str) -> Result<Value, ReviewError> {
    let cleaned = strip_code_fences(content);
    let value: Value = serde_json::from_str(cleaned)
        .map_err(|err| ReviewError::UpstreamMalformed(format!("reply is not JSON: {}", err)))?;

    if !value.is_object() {
        return Err(ReviewError::UpstreamMalformed(format!(
            "reply is JSON but not an object: {}",
            truncate(cleaned, 80)
        )));
    }

    match check_review(&value) {
        Ok(review) => debug!(average_score = review.average_score(), "review reply conforms"),
        Err(violations) => {
            for violation in violations {
                warn!(%violation, "review reply deviates from schema, forwarding as is");
            }
        }
    }

    Ok(value)
}

pub fn normalize(envelope: Value) -> Result<Value, ReviewError> {
    let content = extract_content(&envelope)?;
    parse_review(&content)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
