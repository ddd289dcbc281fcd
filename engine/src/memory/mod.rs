//! Bounded in-memory timelines
//!
//! [`BoundedKeyedLog`] is the single capped, ordered collection behind both the
//! mood and the chat store. Each key owns one timeline; a timeline is created on
//! its first append, grows by append, and shrinks only when an append pushes it
//! past capacity. Nothing is persisted.
//!
//! # Invariants
//!
//! After every append, for every key:
//! - the timeline holds at most `capacity` entries;
//! - the retained entries are exactly the `capacity` most recently appended;
//! - their relative order matches insertion order, ascending or descending
//!   depending on the [`OrderPolicy`].
//!
//! All timelines of a log share one `RwLock`. Appends take the write half, so the
//! length check and the eviction happen atomically with the insert; reads take the
//! read half and copy the timeline out, so callers never hold references into
//! store internals and never see a half-evicted timeline.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod chat;
pub mod mood;

pub use chat::ChatStore;
pub use mood::MoodStore;

/// Read order of a timeline, which also fixes the eviction end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPolicy {
    /// Insert at the front, evict from the back
    NewestFirst,

    /// Insert at the back, evict from the front
    OldestFirst,
}

/// A capped, ordered log partitioned by key
#[derive(Debug)]
pub struct BoundedKeyedLog<K, T> {
    capacity: NonZeroUsize,
    order: OrderPolicy,
    timelines: RwLock<HashMap<K, VecDeque<T>>>,
}

impl<K, T> BoundedKeyedLog<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    /// Create an empty log holding at most `capacity` entries per key
    pub fn new(capacity: NonZeroUsize, order: OrderPolicy) -> Self {
        Self {
            capacity,
            order,
            timelines: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn order(&self) -> OrderPolicy {
        self.order
    }

    /// Append `value` to the timeline for `key`, evicting the oldest entries if
    /// the timeline now exceeds capacity. Returns the resulting timeline length.
    pub fn append(&self, key: K, value: T) -> usize {
        let cap = self.capacity.get();
        let mut timelines = self.write();
        let timeline = timelines
            .entry(key)
            .or_insert_with(|| VecDeque::with_capacity(cap.min(64)));

        match self.order {
            OrderPolicy::NewestFirst => {
                timeline.push_front(value);
                timeline.truncate(cap);
            }
            OrderPolicy::OldestFirst => {
                timeline.push_back(value);
                while timeline.len() > cap {
                    timeline.pop_front();
                }
            }
        }

        timeline.len()
    }

    /// Snapshot of the timeline for `key` in read order; empty for an unknown key.
    pub fn list<Q>(&self, key: &Q) -> Vec<T>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.read()
            .get(key)
            .map(|timeline| timeline.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Current length of the timeline for `key`
    pub fn len<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.read().get(key).map_or(0, VecDeque::len)
    }

    /// Number of keys that have received at least one append
    pub fn key_count(&self) -> usize {
        self.read().len()
    }

    // Every mutation is one push plus one truncate, so a poisoned lock still
    // guards consistent timelines.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, VecDeque<T>>> {
        self.timelines.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, VecDeque<T>>> {
        self.timelines.write().unwrap_or_else(PoisonError::into_inner)
    }
}
