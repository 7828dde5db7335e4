//! Minimal OpenAI-compatible chat completion wire types.
//!
//! Only the outbound request is modelled in full. Replies are read as a
//! generic JSON tree, since providers differ in what else they return; the
//! helpers here pick out the few values the review pipeline looks at.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const CONTENT_POINTER: &str = "/choices/0/message/content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormatType {
    JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: ResponseFormatType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// Text content of the first choice. Nothing else in the envelope is
/// inspected, so unfamiliar ids, roles or extra fields never matter.
pub fn first_content(envelope: &Value) -> Option<&str> {
    envelope.pointer(CONTENT_POINTER).and_then(Value::as_str)
}

/// Token usage, when the provider reports it in the usual shape.
pub fn usage(envelope: &Value) -> Option<Usage> {
    envelope
        .get("usage")
        .and_then(|usage| serde_json::from_value(usage.clone()).ok())
}
