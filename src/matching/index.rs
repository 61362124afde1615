//! Matching index: pending records bucketed by matching key

use std::collections::{HashMap, VecDeque};

use crate::matching::key::MatchKey;

/// Multiset of pending records of one kind, keyed by [`MatchKey`]
///
/// Records sharing a key are kept in arrival order and removed oldest first.
/// Every record is tagged with a running sequence number so that
/// [`MatchingIndex::drain_all`] can hand the leftovers back in the order they
/// were inserted, regardless of how the buckets are laid out in memory.
#[derive(Debug, Clone)]
pub struct MatchingIndex<T> {
    buckets: HashMap<MatchKey, VecDeque<(u64, T)>>,
    next_seq: u64,
    len: usize,
}

impl<T> MatchingIndex<T> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            next_seq: 0,
            len: 0,
        }
    }

    /// Create an empty index sized for roughly `capacity` distinct keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
            next_seq: 0,
            len: 0,
        }
    }

    /// Append `item` to the bucket for `key`, creating the bucket if needed
    pub fn insert(&mut self, key: MatchKey, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.buckets.entry(key).or_default().push_back((seq, item));
        self.len += 1;
    }

    /// Remove and return the oldest item filed under `key`
    ///
    /// The bucket is dropped once its last item is taken.
    pub fn pop_oldest(&mut self, key: &MatchKey) -> Option<T> {
        let bucket = self.buckets.get_mut(key)?;
        let (_, item) = bucket.pop_front()?;
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        self.len -= 1;
        Some(item)
    }

    /// Whether any item is pending under `key`
    pub fn contains(&self, key: &MatchKey) -> bool {
        self.buckets.contains_key(key)
    }

    /// Total number of pending items
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys with pending items
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Remove every pending item, oldest insertion first
    pub fn drain_all(&mut self) -> Vec<T> {
        let mut items: Vec<(u64, T)> = self
            .buckets
            .drain()
            .flat_map(|(_, bucket)| bucket)
            .collect();
        items.sort_unstable_by_key(|(seq, _)| *seq);
        self.len = 0;
        items.into_iter().map(|(_, item)| item).collect()
    }
}

impl<T> Default for MatchingIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
