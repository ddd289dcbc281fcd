//! Reply normalization
//!
//! Upstream responses come in more than one shape. Some models stream a partial
//! `delta.reasoning_content` fragment on the first choice, most return
//! `message.content`, and some return neither. Extraction walks a fixed precedence
//! list and always ends in a string:
//!
//! 1. `choices[0].delta.reasoning_content`, if a non-empty string
//! 2. `choices[0].message.content`, if a non-empty string
//! 3. [`NO_RESPONSE_FALLBACK`]

use serde_json::Value;

/// Reply used when the model produced no usable text
pub const NO_RESPONSE_FALLBACK: &str = "No response from model.";

/// Where the reply text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Streaming reasoning fragment of the first choice
    Reasoning(String),

    /// Message content of the first choice
    Content(String),

    /// Neither field carried text
    Fallback,
}

impl ReplySource {
    /// Pick the reply from a parsed response body
    pub fn extract(body: &Value) -> Self {
        let first = body.pointer("/choices/0");

        let reasoning = first.and_then(|c| c.pointer("/delta/reasoning_content"));
        if let Some(text) = non_empty_str(reasoning) {
            return Self::Reasoning(text.to_string());
        }

        let content = first.and_then(|c| c.pointer("/message/content"));
        if let Some(text) = non_empty_str(content) {
            return Self::Content(text.to_string());
        }

        Self::Fallback
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reasoning(_) => "reasoning",
            Self::Content(_) => "content",
            Self::Fallback => "fallback",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Reasoning(text) | Self::Content(text) => text,
            Self::Fallback => NO_RESPONSE_FALLBACK.to_string(),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
