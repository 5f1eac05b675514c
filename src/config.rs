//! YAML configuration for the streaming primitives.
//!
//! Carries the construction parameters (`k`, `window_size`, `threshold`, scan
//! limits) so a query layer can load them once and build fresh primitives per
//! query. Every field has a default; an empty document is valid.

use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyDetector, StatisticsMode, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE};
use crate::error::{Error, Result};
use crate::top_k::TopKFrequent;

/// Top-K settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKConfig {
    /// Maximum number of items reported.
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    10
}

impl Default for TopKConfig {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

/// Anomaly detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Number of recent values retained.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Z-score cutoff.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Running (default) or sliding_window statistics.
    #[serde(default)]
    pub statistics: StatisticsMode,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}
fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            threshold: default_threshold(),
            statistics: StatisticsMode::default(),
        }
    }
}

/// Batch scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Z-score cutoff applied to each column.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum flagged rows returned.
    #[serde(default = "default_scan_limit")]
    pub limit: usize,
}

fn default_scan_limit() -> usize {
    50
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { threshold: default_threshold(), limit: default_scan_limit() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Top-K settings.
    #[serde(default)]
    pub top_k: TopKConfig,

    /// Anomaly detector settings.
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Batch scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            top_k: TopKConfig::default(),
            anomaly: AnomalyConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the line number if parsing fails,
    /// or [`Error::InvalidConfiguration`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Checks every construction parameter without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.top_k.k == 0 {
            return Err(Error::invalid("k", "must be at least 1, got 0"));
        }
        if self.anomaly.window_size == 0 {
            return Err(Error::invalid("window_size", "must be at least 1, got 0"));
        }
        for threshold in [self.anomaly.threshold, self.scan.threshold] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(Error::invalid(
                    "threshold",
                    format!("must be a finite non-negative z-score, got {threshold}"),
                ));
            }
        }
        if self.scan.limit == 0 {
            return Err(Error::invalid("limit", "must be at least 1, got 0"));
        }
        Ok(())
    }

    /// Builds a fresh top-K tracker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `k` is 0.
    pub fn top_k<T: Eq + Hash + Clone>(&self) -> Result<TopKFrequent<T>> {
        TopKFrequent::new(self.top_k.k)
    }

    /// Builds a fresh anomaly detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a bad window size or threshold.
    pub fn anomaly_detector(&self) -> Result<AnomalyDetector> {
        Ok(AnomalyDetector::new(self.anomaly.window_size, self.anomaly.threshold)?
            .with_statistics(self.anomaly.statistics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = AnalyticsConfig::new();
        assert_eq!(config.version, 1);
        assert_eq!(config.top_k.k, 10);
        assert_eq!(config.anomaly.window_size, 100);
        assert!((config.anomaly.threshold - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.scan.limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = AnalyticsConfig::parse("version: 1").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r"
version: 1
top_k:
  k: 5
anomaly:
  window_size: 20
  threshold: 3.0
  statistics: sliding_window
scan:
  threshold: 2.0
  limit: 10
";
        let config = AnalyticsConfig::parse(yaml).unwrap();
        assert_eq!(config.top_k.k, 5);
        assert_eq!(config.anomaly.window_size, 20);
        assert_eq!(config.anomaly.statistics, StatisticsMode::SlidingWindow);
        assert_eq!(config.scan.limit, 10);

        let detector = config.anomaly_detector().unwrap();
        assert_eq!(detector.window().capacity(), 20);
        assert_eq!(detector.statistics(), StatisticsMode::SlidingWindow);

        let top = config.top_k::<String>().unwrap();
        assert_eq!(top.k(), 5);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = "version: 1\ntop_k:\n  k: [not, a, number]\n";
        let err = AnalyticsConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains('3'), "Error should include line number");
    }

    #[test]
    fn test_config_rejects_zero_k() {
        let err = AnalyticsConfig::parse("top_k:\n  k: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { parameter: "k", .. }));
    }

    #[test]
    fn test_config_rejects_negative_threshold() {
        let err = AnalyticsConfig::parse("scan:\n  threshold: -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { parameter: "threshold", .. }));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "anomaly:\n  window_size: 7").unwrap();

        let config = AnalyticsConfig::load(file.path()).unwrap();
        assert_eq!(config.anomaly.window_size, 7);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = AnalyticsConfig::load("/nonexistent/trip-analytics.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert_eq!(
            AnalyticsConfig::load_or_default("/nonexistent/trip-analytics.yaml"),
            AnalyticsConfig::default()
        );
    }

    #[test]
    fn test_config_roundtrip_yaml() {
        let config = AnalyticsConfig::default();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert_eq!(AnalyticsConfig::parse(&yaml).unwrap(), config);
    }
}
