use haven_engine::memory::{BoundedKeyedLog, ChatStore, MoodStore, OrderPolicy};
use proptest::prelude::*;
use sdk::types::{ChatMessage, MoodEntry};
use serde_json::json;
use std::num::NonZeroUsize;

fn mood(id: usize) -> MoodEntry {
    MoodEntry::new(json!({"id": id, "date": "2024-05-01", "mood": "ok"}))
}

fn message(n: usize) -> ChatMessage {
    ChatMessage::new(json!({"text": format!("message {}", n), "sender": "user"}))
}

// Bounded growth: a timeline never exceeds its capacity and keeps min(n, cap) entries
proptest! {
    #[test]
    fn test_log_length_is_bounded(cap in 1usize..20, n in 0usize..60) {
        let log = BoundedKeyedLog::new(NonZeroUsize::new(cap).unwrap(), OrderPolicy::OldestFirst);
        for i in 0..n {
            let len = log.append("k", i);
            prop_assert!(len <= cap);
        }
        prop_assert_eq!(log.len("k"), n.min(cap));
    }
}

// Recency: the retained entries are exactly the last `cap` appended, in policy order
proptest! {
    #[test]
    fn test_log_keeps_most_recent(
        cap in 1usize..20,
        n in 1usize..60,
        newest_first in any::<bool>(),
    ) {
        let order = if newest_first { OrderPolicy::NewestFirst } else { OrderPolicy::OldestFirst };
        let log = BoundedKeyedLog::new(NonZeroUsize::new(cap).unwrap(), order);
        for i in 0..n {
            log.append("k", i);
        }

        let mut expected: Vec<usize> = (n.saturating_sub(cap)..n).collect();
        if newest_first {
            expected.reverse();
        }
        prop_assert_eq!(log.list("k"), expected);
    }
}

// Key isolation: appends under one key never change another key's timeline
proptest! {
    #[test]
    fn test_keys_are_isolated(writes in prop::collection::vec((0u8..4, any::<u16>()), 0..80)) {
        let log = BoundedKeyedLog::new(NonZeroUsize::new(5).unwrap(), OrderPolicy::OldestFirst);
        for (key, value) in &writes {
            log.append(*key, *value);
        }

        for key in 0u8..4 {
            let mine: Vec<u16> = writes
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .collect();
            let expected: Vec<u16> = mine[mine.len().saturating_sub(5)..].to_vec();
            prop_assert_eq!(log.list(&key), expected);
        }
    }
}

// Idempotent reads: listing twice without a write returns the same sequence
proptest! {
    #[test]
    fn test_reads_are_idempotent(n in 0usize..150) {
        let store = MoodStore::default();
        for i in 0..n {
            store.record(mood(i + 1)).unwrap();
        }
        prop_assert_eq!(store.all(), store.all());
        prop_assert_eq!(store.len(), n.min(100));
    }
}

// Mood store: newest first, first element is the last accepted entry
proptest! {
    #[test]
    fn test_mood_newest_first(n in 1usize..130) {
        let store = MoodStore::default();
        for i in 0..n {
            store.record(mood(i + 1)).unwrap();
        }
        let all = store.all();
        prop_assert_eq!(all[0].id(), Some(&json!(n)));
        prop_assert_eq!(all.last().unwrap().id(), Some(&json!(n - all.len() + 1)));
    }
}

// Chat store: per-conversation cap of 50, oldest first
proptest! {
    #[test]
    fn test_chat_oldest_first(n in 1usize..80) {
        let store = ChatStore::default();
        for i in 0..n {
            store.record("alex", message(i)).unwrap();
        }
        let history = store.history("alex");
        prop_assert_eq!(history.len(), n.min(50));
        let newest = format!("message {}", n - 1);
        prop_assert_eq!(history.last().unwrap().text(), Some(newest.as_str()));
        prop_assert!(store.history("sam").is_empty());
    }
}

// Validation: entries missing a required field never change the store
proptest! {
    #[test]
    fn test_invalid_mood_leaves_store_unchanged(
        id in prop_oneof![Just(json!(null)), Just(json!(0)), Just(json!("")), Just(json!(false))],
        extra in "[a-z]{0,8}",
    ) {
        let store = MoodStore::default();
        store.record(mood(1)).unwrap();
        let before = store.all();

        let entry = MoodEntry::new(json!({"id": id, "date": "2024-05-01", "note": extra}));
        let result = store.record(entry);
        prop_assert!(result.is_err());
        prop_assert_eq!(store.all(), before);
    }
}

proptest! {
    #[test]
    fn test_invalid_chat_leaves_store_unchanged(
        text in prop_oneof![Just(json!(null)), Just(json!(""))],
    ) {
        let store = ChatStore::default();
        let msg = ChatMessage::new(json!({"text": text, "sender": "user"}));
        let result = store.record("alex", msg);
        prop_assert!(result.is_err());
        prop_assert!(store.history("alex").is_empty());
        prop_assert_eq!(store.conversation_count(), 0);
    }
}
