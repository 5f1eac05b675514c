//! Bounded FIFO window over the most recent observations.
//!
//! - **Bounded capacity**: never holds more than the configured number of values
//! - **Eviction is reported**: `push` hands back the value that fell out, so
//!   accumulators can retract it from running sums
//!
//! # Example
//!
//! ```rust
//! use trip_analytics::window::SlidingWindow;
//!
//! let mut window = SlidingWindow::new(3)?;
//! for i in 0..5 {
//!     window.push(i);
//! }
//! assert_eq!(window.len(), 3);
//! assert_eq!(window.oldest(), Some(&2));
//! # Ok::<(), trip_analytics::Error>(())
//! ```

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// Capacity used by [`SlidingWindow::default`].
pub const DEFAULT_CAPACITY: usize = 100;

/// A fixed-capacity first-in-first-out window.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    data: VecDeque<T>,
    /// Maximum capacity (never exceeded).
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// Creates an empty window holding at most `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("window_size", "must be at least 1, got 0"));
        }
        Ok(Self { data: VecDeque::with_capacity(capacity), capacity })
    }

    /// Appends a value, returning the oldest value if the window was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity { self.data.pop_front() } else { None };
        self.data.push_back(value);
        evicted
    }

    /// Returns the oldest value, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.data.front()
    }

    /// Returns the current number of values in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the maximum capacity of the window.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Default for SlidingWindow<T> {
    /// Creates an empty window of [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self { data: VecDeque::with_capacity(DEFAULT_CAPACITY), capacity: DEFAULT_CAPACITY }
    }
}
