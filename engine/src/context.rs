//! Composition root
//!
//! Builds the stores, the gateway and the catalog from configuration and wraps
//! them in the handles the API server consumes. Nothing here is global: each call
//! produces an independent set of services.

use sdk::core_context::{ChatHandle, CompletionHandle, CoreContext, MoodHandle, MusicHandle};
use sdk::errors::EngineError;
use std::sync::Arc;

use crate::config::Config;
use crate::llm::CompletionGateway;
use crate::memory::{ChatStore, MoodStore};
use crate::music::MusicCatalog;

/// The engine's services, kept alongside the handles that point at them
pub struct Services {
    pub mood: Arc<MoodStore>,
    pub chat: Arc<ChatStore>,
    pub gateway: Arc<CompletionGateway>,
    pub music: Arc<MusicCatalog>,
}

impl Services {
    /// Construct every service from configuration
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        Ok(Self {
            mood: Arc::new(MoodStore::new(config.memory.mood_capacity()?)),
            chat: Arc::new(ChatStore::new(config.memory.chat_capacity()?)),
            gateway: Arc::new(CompletionGateway::new(config.completion.clone())?),
            music: Arc::new(MusicCatalog::builtin()),
        })
    }

    /// Handles over these services for the HTTP layer
    pub fn context(&self) -> CoreContext {
        CoreContext::new(
            MoodHandle::new(Arc::clone(&self.mood) as _),
            ChatHandle::new(Arc::clone(&self.chat) as _),
            CompletionHandle::new(Arc::clone(&self.gateway) as _),
            MusicHandle::new(Arc::clone(&self.music) as _),
        )
    }
}
