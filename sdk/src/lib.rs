//! Haven SDK
//!
//! Shared library providing the data model, error taxonomy and service handles
//! for Haven components. This crate is used by both the engine and the API server.

/// Service handles and the context bundle passed to the HTTP layer
pub mod core_context;

/// Error types and handling
pub mod errors;

/// Mood, chat, completion and music payload types
pub mod types;

// Re-export commonly used types
pub use core_context::{
    ChatHandle, ChatHandleImpl, CompletionHandle, CompletionHandleImpl, CoreContext, MoodHandle,
    MoodHandleImpl, MusicHandle, MusicHandleImpl,
};
pub use errors::{EngineError, GatewayError, HavenErrorExt, ValidationError};
pub use types::{
    ChatMessage, CompletionReply, CompletionRequest, MoodEntry, MusicTrack, TrackCategory,
};
