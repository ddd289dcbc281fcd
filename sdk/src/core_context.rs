//! Context and handle types
//!
//! CoreContext is the sole API surface through which the HTTP layer reaches
//! engine services. Each handle wraps a trait object implemented by the engine,
//! so the server never sees store or gateway internals and tests can swap in doubles.

use crate::errors::{GatewayError, ValidationError};
use crate::types::{ChatMessage, MoodEntry, MusicTrack, TrackCategory};
use async_trait::async_trait;
use std::sync::Arc;

/// Context handed to the API server.
#[derive(Clone)]
pub struct CoreContext {
    /// Handle for the global mood timeline
    pub mood: MoodHandle,

    /// Handle for per-conversation chat timelines
    pub chat: ChatHandle,

    /// Handle for the completion gateway
    pub completion: CompletionHandle,

    /// Handle for the music catalog
    pub music: MusicHandle,
}

impl CoreContext {
    /// Create a new CoreContext with all handles
    pub fn new(
        mood: MoodHandle,
        chat: ChatHandle,
        completion: CompletionHandle,
        music: MusicHandle,
    ) -> Self {
        Self {
            mood,
            chat,
            completion,
            music,
        }
    }
}

/// Handle for mood operations
#[derive(Clone)]
pub struct MoodHandle {
    inner: Arc<dyn MoodHandleImpl>,
}

impl MoodHandle {
    /// Create a new MoodHandle with the given implementation
    pub fn new(inner: Arc<dyn MoodHandleImpl>) -> Self {
        Self { inner }
    }

    /// Validate and record a mood entry
    pub fn record(&self, entry: MoodEntry) -> Result<(), ValidationError> {
        self.inner.record(entry)
    }

    /// Snapshot of all entries, newest first
    pub fn all(&self) -> Vec<MoodEntry> {
        self.inner.all()
    }
}

/// Trait for mood handle implementation (to be implemented by engine)
pub trait MoodHandleImpl: Send + Sync {
    fn record(&self, entry: MoodEntry) -> Result<(), ValidationError>;

    fn all(&self) -> Vec<MoodEntry>;
}

/// Handle for chat history operations
#[derive(Clone)]
pub struct ChatHandle {
    inner: Arc<dyn ChatHandleImpl>,
}

impl ChatHandle {
    /// Create a new ChatHandle with the given implementation
    pub fn new(inner: Arc<dyn ChatHandleImpl>) -> Self {
        Self { inner }
    }

    /// Validate and record a message under a conversation key
    pub fn record(&self, conversation: &str, message: ChatMessage) -> Result<(), ValidationError> {
        self.inner.record(conversation, message)
    }

    /// Snapshot of one conversation in chronological order
    pub fn history(&self, conversation: &str) -> Vec<ChatMessage> {
        self.inner.history(conversation)
    }
}

/// Trait for chat handle implementation (to be implemented by engine)
pub trait ChatHandleImpl: Send + Sync {
    fn record(&self, conversation: &str, message: ChatMessage) -> Result<(), ValidationError>;

    fn history(&self, conversation: &str) -> Vec<ChatMessage>;
}

/// Handle for completion calls
#[derive(Clone)]
pub struct CompletionHandle {
    inner: Arc<dyn CompletionHandleImpl>,
}

impl CompletionHandle {
    /// Create a new CompletionHandle with the given implementation
    pub fn new(inner: Arc<dyn CompletionHandleImpl>) -> Self {
        Self { inner }
    }

    /// Ask the model for a reply to `prompt` under `system_prompt`
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<String, GatewayError> {
        self.inner.complete(prompt, system_prompt).await
    }
}

/// Trait for completion handle implementation (to be implemented by engine)
#[async_trait]
pub trait CompletionHandleImpl: Send + Sync {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, GatewayError>;
}

/// Handle for the read-only music catalog
#[derive(Clone)]
pub struct MusicHandle {
    inner: Arc<dyn MusicHandleImpl>,
}

impl MusicHandle {
    /// Create a new MusicHandle with the given implementation
    pub fn new(inner: Arc<dyn MusicHandleImpl>) -> Self {
        Self { inner }
    }

    /// Tracks, optionally restricted to one category
    pub fn tracks(&self, category: Option<TrackCategory>) -> Vec<MusicTrack> {
        self.inner.tracks(category)
    }
}

/// Trait for music handle implementation (to be implemented by engine)
pub trait MusicHandleImpl: Send + Sync {
    fn tracks(&self, category: Option<TrackCategory>) -> Vec<MusicTrack>;
}
