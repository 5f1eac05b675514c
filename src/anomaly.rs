//! Online z-score anomaly detection over a bounded window.
//!
//! Each [`AnomalyDetector::add`] appends to a FIFO window, updates the running
//! mean and variance, and flags the value if its z-score against those
//! statistics exceeds the threshold. Past values are never relabelled.
//!
//! ## Statistics modes
//!
//! - [`StatisticsMode::Running`]: Welford-style incremental update with `n`
//!   taken as the current window length. Evicted values are not retracted, so
//!   once the window is full the estimate drifts from the window's true
//!   variance. This is the default.
//! - [`StatisticsMode::SlidingWindow`]: sum and sum-of-squares over the live
//!   window, retracting evicted values. Gives the sample variance of exactly
//!   the values currently in the window.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Error, Result};
use crate::window::SlidingWindow;

/// Default number of recent values retained.
pub const DEFAULT_WINDOW_SIZE: usize = crate::window::DEFAULT_CAPACITY;

/// Default z-score cutoff.
pub const DEFAULT_THRESHOLD: f64 = 2.5;

/// Minimum window length before a z-score is meaningful.
const MIN_SAMPLES: usize = 3;

/// How the detector maintains mean and variance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsMode {
    /// Incremental update that never retracts evicted values.
    #[default]
    Running,
    /// Exact statistics over the current window contents.
    SlidingWindow,
}

/// Streaming anomaly flagger.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    window: SlidingWindow<f64>,
    threshold: f64,
    mode: StatisticsMode,
    mean: f64,
    variance: f64,
    // SlidingWindow mode only: sums of (value - shift) over the live window
    shift: f64,
    sum: f64,
    sum_sq: f64,
    evictions_since_resync: usize,
    last_z_score: Option<f64>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::build(SlidingWindow::default(), DEFAULT_THRESHOLD)
    }
}

impl AnomalyDetector {
    /// Creates a detector keeping `window_size` values and flagging z-scores
    /// above `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `window_size` is 0 or
    /// `threshold` is negative or not finite.
    pub fn new(window_size: usize, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::invalid(
                "threshold",
                format!("must be a finite non-negative z-score, got {threshold}"),
            ));
        }
        let window = SlidingWindow::new(window_size)?;
        tracing::debug!(window_size, threshold, "anomaly detector created");
        Ok(Self::build(window, threshold))
    }

    fn build(window: SlidingWindow<f64>, threshold: f64) -> Self {
        Self {
            window,
            threshold,
            mode: StatisticsMode::default(),
            mean: 0.0,
            variance: 0.0,
            shift: 0.0,
            sum: 0.0,
            sum_sq: 0.0,
            evictions_since_resync: 0,
            last_z_score: None,
        }
    }

    /// Selects how mean and variance are maintained.
    ///
    /// Switching to [`StatisticsMode::SlidingWindow`] after values were added
    /// rebuilds the window sums from the retained values.
    #[must_use]
    pub fn with_statistics(mut self, mode: StatisticsMode) -> Self {
        if mode == StatisticsMode::SlidingWindow && self.mode != mode {
            self.resync_window_sums();
            self.refresh_sliding_stats();
        }
        self.mode = mode;
        self
    }

    /// Adds a value and returns whether it is anomalous.
    ///
    /// Always `false` while fewer than three values are in the window or while
    /// the variance is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteValue`] for NaN or infinities; the state is
    /// left unchanged.
    pub fn add(&mut self, value: f64) -> Result<bool> {
        let value = ensure_finite(value)?;
        self.last_z_score = None;

        let evicted = self.window.push(value);
        let n = self.window.len();

        match self.mode {
            StatisticsMode::Running => self.update_running(value, n),
            StatisticsMode::SlidingWindow => self.update_sliding(value, evicted, n),
        }

        if n < MIN_SAMPLES || self.variance <= 0.0 {
            return Ok(false);
        }

        let z = (value - self.mean).abs() / self.variance.sqrt();
        self.last_z_score = Some(z);

        let flagged = z > self.threshold;
        if flagged {
            tracing::debug!(value, z_score = z, mean = self.mean, "anomaly flagged");
        }
        Ok(flagged)
    }

    fn update_running(&mut self, value: f64, n: usize) {
        if n == 1 {
            self.mean = value;
            self.variance = 0.0;
            return;
        }
        let n = n as f64;
        let old_mean = self.mean;
        self.mean = old_mean + (value - old_mean) / n;
        self.variance =
            ((n - 2.0) * self.variance + (value - old_mean) * (value - self.mean)) / (n - 1.0);
    }

    fn update_sliding(&mut self, value: f64, evicted: Option<f64>, n: usize) {
        if n == 1 {
            // Sole value in the window: nothing left to retract.
            self.shift = value;
            self.sum = 0.0;
            self.sum_sq = 0.0;
            self.evictions_since_resync = 0;
            self.refresh_sliding_stats();
            return;
        }
        let d = value - self.shift;
        self.sum += d;
        self.sum_sq += d * d;
        if let Some(old) = evicted {
            let d = old - self.shift;
            self.sum -= d;
            self.sum_sq -= d * d;
            self.evictions_since_resync += 1;
            // Once per full turnover: re-pick the shift and recompute to shed rounding drift.
            if self.evictions_since_resync >= self.window.capacity() {
                self.resync_window_sums();
            }
        }
        self.refresh_sliding_stats();
    }

    fn resync_window_sums(&mut self) {
        self.shift = self.window.oldest().copied().unwrap_or(0.0);
        let shift = self.shift;
        self.sum = self.window.iter().map(|v| v - shift).sum();
        self.sum_sq = self.window.iter().map(|v| (v - shift) * (v - shift)).sum();
        self.evictions_since_resync = 0;
    }

    fn refresh_sliding_stats(&mut self) {
        let n = self.window.len();
        if n == 0 {
            return;
        }
        let len = n as f64;
        self.mean = self.shift + self.sum / len;
        self.variance = if n < 2 {
            0.0
        } else {
            ((self.sum_sq - self.sum * self.sum / len) / (len - 1.0)).max(0.0)
        };
    }

    /// Current running mean.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Current running variance.
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Square root of [`variance`](Self::variance).
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }

    /// Number of values currently in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Returns true if no value has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The retained values, oldest first.
    #[must_use]
    pub fn window(&self) -> &SlidingWindow<f64> {
        &self.window
    }

    /// The z-score cutoff.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Active statistics mode.
    #[must_use]
    pub fn statistics(&self) -> StatisticsMode {
        self.mode
    }

    /// Z-score of the most recent value, if one was computed.
    #[must_use]
    pub fn last_z_score(&self) -> Option<f64> {
        self.last_z_score
    }
}
