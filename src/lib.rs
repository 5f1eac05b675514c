//! # trip-analytics
//!
//! Streaming numeric primitives for summarizing a bounded sequence of trip
//! observations without retaining the full sequence.
//!
//! ## Primitives
//!
//! - [`heap::BinaryHeap`]: array-backed heap, min- or max-ordered by type parameter
//! - [`top_k::TopKFrequent`]: frequency table plus a bounded min-heap of candidates
//! - [`median::MedianCalculator`]: running median over two balanced heaps
//! - [`anomaly::AnomalyDetector`]: windowed mean/variance with a z-score flag
//!
//! Each primitive is an owned, single-threaded accumulator: construct one per
//! query, feed it values, read the result, drop it. Share an instance across
//! threads only behind a lock.
//!
//! ## Quick Start
//!
//! ```rust
//! use trip_analytics::prelude::*;
//!
//! let mut median = MedianCalculator::new();
//! for speed in [18.0, 22.5, 31.0, 12.0] {
//!     median.add(speed)?;
//! }
//! assert_eq!(median.get_median()?, 20.25);
//!
//! let mut hours = TopKFrequent::new(2)?;
//! for (hour, trips) in [(8u8, 120), (18, 340), (23, 90)] {
//!     hours.add_count(hour, trips);
//! }
//! assert_eq!(hours.get_top_k(), vec![(18, 340), (8, 120)]);
//! # Ok::<(), trip_analytics::Error>(())
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Primitives
// ============================================================================

/// Generic comparator-parameterized binary heap.
pub mod heap;

/// Bounded top-K frequency tracking.
pub mod top_k;

/// Running median.
pub mod median;

/// Online anomaly detection.
pub mod anomaly;

/// Bounded FIFO window.
pub mod window;

// ============================================================================
// Query Helpers
// ============================================================================

/// Batch z-score scan over trip rows.
pub mod scan;

/// Pickup-zone bucketing.
pub mod zone;

// ============================================================================
// Configuration & Errors
// ============================================================================

/// YAML configuration for construction parameters.
pub mod config;

/// Error types for trip-analytics operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust
/// use trip_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::anomaly::{AnomalyDetector, StatisticsMode};
    pub use crate::config::AnalyticsConfig;
    pub use crate::error::{Error, Result};
    pub use crate::heap::{BinaryHeap, HeapEntry, MaxHeap, MinHeap};
    pub use crate::median::MedianCalculator;
    pub use crate::scan::{scan_trips, z_scores, AnomalyScan, FlaggedTrip, TripMetrics};
    pub use crate::top_k::{FrequencyEntry, TopKFrequent};
    pub use crate::window::SlidingWindow;
    pub use crate::zone::{top_pickup_zones, PickupZone, ZoneCount};
}
