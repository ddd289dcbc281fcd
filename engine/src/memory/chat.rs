//! Per-conversation chat timelines

use super::{BoundedKeyedLog, OrderPolicy};
use sdk::core_context::ChatHandleImpl;
use sdk::errors::ValidationError;
use sdk::types::ChatMessage;
use std::num::NonZeroUsize;

/// Default number of messages kept per conversation
pub const CHAT_CAPACITY: usize = 50;

/// Chronological message timelines keyed by conversation id
#[derive(Debug)]
pub struct ChatStore {
    log: BoundedKeyedLog<String, ChatMessage>,
}

impl ChatStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            log: BoundedKeyedLog::new(capacity, OrderPolicy::OldestFirst),
        }
    }

    /// Validate and record a message for `conversation`.
    ///
    /// The conversation is created implicitly on its first message.
    pub fn record(&self, conversation: &str, message: ChatMessage) -> Result<(), ValidationError> {
        if conversation.is_empty() {
            tracing::debug!("Rejected chat message without conversation id");
            return Err(ValidationError::InvalidChatMessage {
                field: "conversationId",
            });
        }
        if let Err(e) = message.validate() {
            tracing::debug!(conversation, field = e.field(), "Rejected chat message");
            return Err(e);
        }

        let len = self.log.append(conversation.to_string(), message);
        tracing::debug!(conversation, len, "Recorded chat message");
        Ok(())
    }

    /// Messages of one conversation, oldest first; empty for an unknown id.
    pub fn history(&self, conversation: &str) -> Vec<ChatMessage> {
        self.log.list(conversation)
    }

    /// Number of conversations with at least one message
    pub fn conversation_count(&self) -> usize {
        self.log.key_count()
    }

    pub fn capacity(&self) -> usize {
        self.log.capacity()
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(CHAT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl ChatHandleImpl for ChatStore {
    fn record(&self, conversation: &str, message: ChatMessage) -> Result<(), ValidationError> {
        ChatStore::record(self, conversation, message)
    }

    fn history(&self, conversation: &str) -> Vec<ChatMessage> {
        ChatStore::history(self, conversation)
    }
}
