//! Running median over two balanced heaps.
//!
//! `lower` is a max-heap of the smaller half and `upper` a min-heap of the
//! larger half. Sizes never differ by more than one and every value in
//! `lower` is `<=` every value in `upper`.

use crate::error::{ensure_finite, Error, Result};
use crate::heap::{MaxHeap, MinHeap};

/// Running median estimator. O(log n) insert, O(1) read.
#[derive(Debug, Clone, Default)]
pub struct MedianCalculator {
    lower: MaxHeap<f64, ()>,
    upper: MinHeap<f64, ()>,
}

impl MedianCalculator {
    /// Creates an empty calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteValue`] for NaN or infinities; the state is
    /// left unchanged.
    pub fn add(&mut self, value: f64) -> Result<()> {
        let value = ensure_finite(value)?;

        let goes_low = self.lower.peek().map_or(true, |top| value <= top.priority);
        if goes_low {
            self.lower.push(value, ());
        } else {
            self.upper.push(value, ());
        }

        if self.lower.len() > self.upper.len() + 1 {
            let moved = self.lower.pop()?;
            self.upper.push(moved.priority, ());
        } else if self.upper.len() > self.lower.len() + 1 {
            let moved = self.upper.pop()?;
            self.lower.push(moved.priority, ());
        }
        Ok(())
    }

    /// Returns the current median.
    ///
    /// With an even count this is the mean of the two middle values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] if nothing has been added.
    pub fn get_median(&self) -> Result<f64> {
        match (self.lower.peek(), self.upper.peek()) {
            (Err(_), Err(_)) => Err(Error::NoData),
            (Ok(low), Ok(high)) if self.lower.len() == self.upper.len() => {
                Ok((low.priority + high.priority) / 2.0)
            }
            _ if self.lower.len() > self.upper.len() => Ok(self.lower.peek()?.priority),
            _ => Ok(self.upper.peek()?.priority),
        }
    }

    /// Number of values added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// Returns true if no value has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
