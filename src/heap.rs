//! Array-backed binary heap parameterized by ordering.
//!
//! One sift-up/sift-down implementation serves every component: the top-K
//! tracker uses a [`MinHeap`], the running median pairs a [`MaxHeap`] for the
//! lower half with a [`MinHeap`] for the upper half.
//!
//! Positions are 0-indexed; children of `i` live at `2i + 1` and `2i + 2`.
//! Sub-order among equal priorities is unspecified.

use std::marker::PhantomData;

use crate::error::{Error, Result};

/// Decides which of two priorities sits closer to the root.
pub trait HeapOrder {
    /// Returns true if `a` must be popped strictly before `b`.
    fn precedes<P: PartialOrd>(a: &P, b: &P) -> bool;
}

/// Smallest priority at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinOrder;

impl HeapOrder for MinOrder {
    #[inline]
    fn precedes<P: PartialOrd>(a: &P, b: &P) -> bool {
        a < b
    }
}

/// Largest priority at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxOrder;

impl HeapOrder for MaxOrder {
    #[inline]
    fn precedes<P: PartialOrd>(a: &P, b: &P) -> bool {
        a > b
    }
}

/// A `(priority, payload)` pair stored in the heap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapEntry<P, T> {
    /// Ordering key.
    pub priority: P,
    /// Opaque value carried alongside the key.
    pub payload: T,
}

impl<P, T> HeapEntry<P, T> {
    /// Splits the entry into `(priority, payload)`.
    pub fn into_parts(self) -> (P, T) {
        (self.priority, self.payload)
    }
}

/// Binary heap over [`HeapEntry`] values ordered by `O`.
#[derive(Debug, Clone)]
pub struct BinaryHeap<P, T, O = MinOrder> {
    entries: Vec<HeapEntry<P, T>>,
    order: PhantomData<O>,
}

/// Heap whose root is the minimum priority.
pub type MinHeap<P, T> = BinaryHeap<P, T, MinOrder>;

/// Heap whose root is the maximum priority.
pub type MaxHeap<P, T> = BinaryHeap<P, T, MaxOrder>;

impl<P, T, O> Default for BinaryHeap<P, T, O> {
    fn default() -> Self {
        Self { entries: Vec::new(), order: PhantomData }
    }
}

impl<P: PartialOrd, T, O: HeapOrder> BinaryHeap<P, T, O> {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity), order: PhantomData }
    }

    /// Inserts an entry. O(log n).
    pub fn push(&mut self, priority: P, payload: T) {
        self.entries.push(HeapEntry { priority, payload });
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes and returns the root entry. O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the heap holds no entries.
    pub fn pop(&mut self) -> Result<HeapEntry<P, T>> {
        if self.entries.is_empty() {
            return Err(Error::EmptyContainer);
        }
        // swap_remove moves the last entry into the root slot.
        let top = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(top)
    }

    /// Returns the root entry without removing it. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the heap holds no entries.
    pub fn peek(&self) -> Result<&HeapEntry<P, T>> {
        self.entries.first().ok_or(Error::EmptyContainer)
    }

    /// Replaces the root with a new entry and returns the old root.
    ///
    /// Equivalent to `pop` followed by `push`, with a single sift.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the heap holds no entries.
    pub fn replace_top(&mut self, priority: P, payload: T) -> Result<HeapEntry<P, T>> {
        let root = self.entries.first_mut().ok_or(Error::EmptyContainer)?;
        let old = std::mem::replace(root, HeapEntry { priority, payload });
        self.sift_down(0);
        Ok(old)
    }

    /// Number of entries. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the heap in pop order.
    #[must_use]
    pub fn into_sorted_vec(mut self) -> Vec<HeapEntry<P, T>> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Ok(entry) = self.pop() {
            sorted.push(entry);
        }
        sorted
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !O::precedes(&self.entries[i].priority, &self.entries[parent].priority) {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;

            if left < len && O::precedes(&self.entries[left].priority, &self.entries[best].priority) {
                best = left;
            }
            if right < len && O::precedes(&self.entries[right].priority, &self.entries[best].priority)
            {
                best = right;
            }
            if best == i {
                break;
            }
            self.entries.swap(i, best);
            i = best;
        }
    }
}
