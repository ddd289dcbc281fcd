//! Payload types
//!
//! Mood entries and chat messages are opaque JSON records: the stores only look at
//! the handful of fields they validate and pass everything else through untouched.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returns true when a JSON field counts as present.
///
/// Absent, `null`, `false`, `0` and `""` are all treated as missing; any other
/// value (including objects and arrays) is present.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A mood journal entry
///
/// Requires a present `id` and `date`; every other attribute is carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodEntry(Value);

impl MoodEntry {
    /// Wrap a raw JSON record. No validation happens here.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The entry identifier
    pub fn id(&self) -> Option<&Value> {
        self.field("id")
    }

    /// The entry date, as supplied by the client
    pub fn date(&self) -> Option<&Value> {
        self.field("date")
    }

    /// Check that `id` and `date` are both present
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in ["id", "date"] {
            if !is_present(self.field(field)) {
                return Err(ValidationError::InvalidMoodEntry { field });
            }
        }
        Ok(())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// A single message in a companion conversation
///
/// Requires a present `text` and `sender`. `sender` is conventionally `user` or `ai`
/// but any non-empty value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessage(Value);

impl ChatMessage {
    /// Wrap a raw JSON record. No validation happens here.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Message body, when it is a string
    pub fn text(&self) -> Option<&str> {
        self.field("text").and_then(Value::as_str)
    }

    /// Message author, when it is a string
    pub fn sender(&self) -> Option<&str> {
        self.field("sender").and_then(Value::as_str)
    }

    /// Check that `text` and `sender` are both present
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in ["text", "sender"] {
            if !is_present(self.field(field)) {
                return Err(ValidationError::InvalidChatMessage { field });
            }
        }
        Ok(())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Body of `POST /api/completion`
///
/// Missing fields deserialize as empty strings and are forwarded upstream unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub prompt: String,

    #[serde(default, rename = "systemPrompt")]
    pub system_prompt: String,
}

impl CompletionRequest {
    /// Read a request from an arbitrary JSON body.
    ///
    /// Each field is taken on its own: a field that is absent or not a string
    /// becomes `""` without affecting the other one.
    pub fn from_value(body: &Value) -> Self {
        let text = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            prompt: text("prompt"),
            system_prompt: text("systemPrompt"),
        }
    }
}

/// Successful completion reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub response: String,
}

/// Music track category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackCategory {
    Stress,
    Anxiety,
    Headache,
    Sleep,
}

impl TrackCategory {
    /// Parse a category name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "stress" => Some(Self::Stress),
            "anxiety" => Some(Self::Anxiety),
            "headache" => Some(Self::Headache),
            "sleep" => Some(Self::Sleep),
            _ => None,
        }
    }
}

/// A relaxation track in the built-in catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub id: String,
    pub name: String,
    pub category: TrackCategory,
    /// Length in seconds
    pub duration: u32,
    pub description: String,
    pub url: String,
}
