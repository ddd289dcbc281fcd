//! Global mood timeline

use super::{BoundedKeyedLog, OrderPolicy};
use sdk::core_context::MoodHandleImpl;
use sdk::errors::ValidationError;
use sdk::types::MoodEntry;
use std::num::NonZeroUsize;

/// Default number of mood entries kept
pub const MOOD_CAPACITY: usize = 100;

/// Single newest-first timeline of mood entries
#[derive(Debug)]
pub struct MoodStore {
    log: BoundedKeyedLog<(), MoodEntry>,
}

impl MoodStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            log: BoundedKeyedLog::new(capacity, OrderPolicy::NewestFirst),
        }
    }

    /// Validate and record an entry. A rejected entry leaves the timeline untouched.
    pub fn record(&self, entry: MoodEntry) -> Result<(), ValidationError> {
        if let Err(e) = entry.validate() {
            tracing::debug!(field = e.field(), "Rejected mood entry");
            return Err(e);
        }

        let len = self.log.append((), entry);
        tracing::debug!(len, "Recorded mood entry");
        Ok(())
    }

    /// All retained entries, newest first
    pub fn all(&self) -> Vec<MoodEntry> {
        self.log.list(&())
    }

    pub fn len(&self) -> usize {
        self.log.len(&())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.log.capacity()
    }
}

impl Default for MoodStore {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(MOOD_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl MoodHandleImpl for MoodStore {
    fn record(&self, entry: MoodEntry) -> Result<(), ValidationError> {
        MoodStore::record(self, entry)
    }

    fn all(&self) -> Vec<MoodEntry> {
        MoodStore::all(self)
    }
}
