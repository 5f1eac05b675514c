//! Bounded top-K frequency tracking.
//!
//! A frequency table records the running count of every distinct item, and a
//! min-heap of at most `k` `(count, item)` snapshots holds the current
//! candidates. A snapshot records the count at the moment it was admitted, so
//! an item can appear more than once and a reported count can lag the item's
//! true total. [`TopKFrequent::exact_top_k`] answers from the full table
//! instead.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::heap::MinHeap;

/// One `(item, count)` row of a top-K answer, ready for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry<T> {
    /// The item identity.
    pub item: T,
    /// Its recorded frequency.
    pub count: u64,
}

/// Streaming top-K frequency tracker.
#[derive(Debug, Clone)]
pub struct TopKFrequent<T> {
    k: usize,
    counts: HashMap<T, u64>,
    heap: MinHeap<u64, T>,
}

impl<T: Eq + Hash + Clone> TopKFrequent<T> {
    /// Creates a tracker reporting at most `k` items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `k` is 0.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::invalid("k", "must be at least 1, got 0"));
        }
        Ok(Self { k, counts: HashMap::new(), heap: MinHeap::with_capacity(k) })
    }

    /// Records one observation of `item`.
    pub fn add(&mut self, item: T) {
        self.add_count(item, 1);
    }

    /// Records `delta` observations of `item` at once.
    ///
    /// Used when the caller has already aggregated counts.
    pub fn add_count(&mut self, item: T, delta: u64) {
        let count = {
            let slot = self.counts.entry(item.clone()).or_insert(0);
            *slot = slot.saturating_add(delta);
            *slot
        };

        if self.heap.len() < self.k {
            self.heap.push(count, item);
            return;
        }

        // Compared against the heap minimum, not the item's own earlier snapshot.
        let admit = self.heap.peek().is_ok_and(|min| count > min.priority);
        if admit {
            if let Ok(evicted) = self.heap.replace_top(count, item) {
                tracing::trace!(evicted_count = evicted.priority, admitted_count = count, "top-k eviction");
            }
        }
    }

    /// Returns up to `k` `(item, count)` pairs, highest count first.
    ///
    /// Non-destructive: repeated calls return the same answer. Order among
    /// equal counts follows heap extraction order and carries no meaning.
    #[must_use]
    pub fn get_top_k(&self) -> Vec<(T, u64)> {
        let mut snapshots = self.heap.clone().into_sorted_vec();
        snapshots.sort_by(|a, b| b.priority.cmp(&a.priority));
        snapshots.truncate(self.k);
        snapshots.into_iter().map(|e| (e.payload, e.priority)).collect()
    }

    /// [`get_top_k`](Self::get_top_k) as serializable entries.
    #[must_use]
    pub fn top_k_entries(&self) -> Vec<FrequencyEntry<T>> {
        self.get_top_k().into_iter().map(|(item, count)| FrequencyEntry { item, count }).collect()
    }

    /// Exact top-K from the full frequency table. O(d log d) in distinct items.
    ///
    /// Each item appears once with its true total.
    #[must_use]
    pub fn exact_top_k(&self) -> Vec<(T, u64)> {
        let mut all: Vec<(T, u64)> = self.counts.iter().map(|(item, &c)| (item.clone(), c)).collect();
        all.sort_by(|a, b| b.1.cmp(&a.1));
        all.truncate(self.k);
        all
    }

    /// True running count of `item` (0 if never seen).
    #[must_use]
    pub fn count(&self, item: &T) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Number of distinct items observed.
    #[must_use]
    pub fn distinct_items(&self) -> usize {
        self.counts.len()
    }

    /// Number of snapshots currently held in the bounded heap.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.heap.len()
    }

    /// The configured bound.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}
