//! Completion service adapter
//!
//! This module talks to an OpenAI-compatible chat-completions endpoint (NVIDIA NIM
//! by default). [`gateway::CompletionGateway`] sends exactly one request per call
//! and [`reply::ReplySource`] reduces whatever comes back to a single string.

use serde::{Deserialize, Serialize};

pub mod gateway;
pub mod reply;

pub use gateway::CompletionGateway;
pub use reply::{ReplySource, NO_RESPONSE_FALLBACK};

/// Message in the upstream conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,

    /// User message
    User,
}

/// Body of a chat-completions request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}
