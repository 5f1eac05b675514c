//! Batch z-score scan over a finite set of trip rows.
//!
//! Unlike [`AnomalyDetector`](crate::anomaly::AnomalyDetector), which scores
//! each value against the history seen so far, this scores every row against
//! the statistics of the whole batch.

use serde::Serialize;

use crate::error::{ensure_finite, Error, Result};

/// Per-trip numeric columns checked for anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripMetrics {
    /// Average trip speed.
    pub speed_kmh: f64,
    /// Fare divided by distance.
    pub fare_per_km: f64,
    /// Trip distance.
    pub distance_km: f64,
}

/// A row with at least one column beyond the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedTrip {
    /// Position of the row in the scanned batch.
    pub index: usize,
    /// Average trip speed.
    pub speed_kmh: f64,
    /// Fare divided by distance.
    pub fare_per_km: f64,
    /// Trip distance.
    pub distance_km: f64,
    /// Signed z-score of `speed_kmh`.
    pub speed_z_score: f64,
    /// Signed z-score of `fare_per_km`.
    pub fare_z_score: f64,
    /// Signed z-score of `distance_km`.
    pub distance_z_score: f64,
}

/// Result of [`scan_trips`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyScan {
    /// Flagged rows in input order, at most `limit` of them.
    pub anomalies: Vec<FlaggedTrip>,
    /// The z-score cutoff that was applied.
    pub threshold: f64,
    /// Number of rows examined.
    pub total_checked: usize,
}

/// Signed z-score of every value against the batch mean and sample standard
/// deviation.
///
/// Every score is 0 when there are fewer than two values or the standard
/// deviation is 0.
///
/// # Errors
///
/// Returns [`Error::NonFiniteValue`] if any value is NaN or infinite.
pub fn z_scores(data: &[f64]) -> Result<Vec<f64>> {
    for &v in data {
        ensure_finite(v)?;
    }
    if data.len() < 2 {
        return Ok(vec![0.0; data.len()]);
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Ok(vec![0.0; data.len()]);
    }
    Ok(data.iter().map(|x| (x - mean) / std_dev).collect())
}

/// Flags rows whose speed, fare-per-km, or distance z-score exceeds
/// `threshold` in absolute value.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] for a negative or non-finite
/// threshold or a zero limit, and [`Error::NonFiniteValue`] for non-finite
/// metrics.
pub fn scan_trips(trips: &[TripMetrics], threshold: f64, limit: usize) -> Result<AnomalyScan> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(Error::invalid(
            "threshold",
            format!("must be a finite non-negative z-score, got {threshold}"),
        ));
    }
    if limit == 0 {
        return Err(Error::invalid("limit", "must be at least 1, got 0"));
    }

    let speed: Vec<f64> = trips.iter().map(|t| t.speed_kmh).collect();
    let fare: Vec<f64> = trips.iter().map(|t| t.fare_per_km).collect();
    let distance: Vec<f64> = trips.iter().map(|t| t.distance_km).collect();

    let speed_z = z_scores(&speed)?;
    let fare_z = z_scores(&fare)?;
    let distance_z = z_scores(&distance)?;

    let anomalies: Vec<FlaggedTrip> = trips
        .iter()
        .enumerate()
        .filter(|&(i, _)| {
            speed_z[i].abs() > threshold
                || fare_z[i].abs() > threshold
                || distance_z[i].abs() > threshold
        })
        .take(limit)
        .map(|(i, t)| FlaggedTrip {
            index: i,
            speed_kmh: t.speed_kmh,
            fare_per_km: t.fare_per_km,
            distance_km: t.distance_km,
            speed_z_score: speed_z[i],
            fare_z_score: fare_z[i],
            distance_z_score: distance_z[i],
        })
        .collect();

    tracing::debug!(total = trips.len(), flagged = anomalies.len(), threshold, "trip scan complete");

    Ok(AnomalyScan { anomalies, threshold, total_checked: trips.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trip(speed_kmh: f64, fare_per_km: f64, distance_km: f64) -> TripMetrics {
        TripMetrics { speed_kmh, fare_per_km, distance_km }
    }

    fn ordinary_trips(n: usize) -> Vec<TripMetrics> {
        (0..n)
            .map(|i| {
                let wobble = (i % 5) as f64 * 0.1;
                trip(20.0 + wobble, 2.5 + wobble / 10.0, 5.0 + wobble)
            })
            .collect()
    }

    #[test]
    fn test_z_scores_known_values() {
        let z = z_scores(&[2.0, 4.0, 6.0]).unwrap();
        // mean 4, sample std 2
        assert_relative_eq!(z[0], -1.0);
        assert_relative_eq!(z[1], 0.0);
        assert_relative_eq!(z[2], 1.0);
    }

    #[test]
    fn test_z_scores_degenerate_inputs() {
        assert!(z_scores(&[]).unwrap().is_empty());
        assert_eq!(z_scores(&[5.0]).unwrap(), vec![0.0]);
        assert_eq!(z_scores(&[3.0, 3.0, 3.0]).unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn test_z_scores_reject_nan() {
        assert!(matches!(z_scores(&[1.0, f64::NAN]), Err(Error::NonFiniteValue(_))));
    }

    #[test]
    fn test_scan_flags_extreme_fare() {
        let mut trips = ordinary_trips(40);
        trips[17] = trip(20.0, 80.0, 5.0);

        let scan = scan_trips(&trips, 2.5, 50).unwrap();

        assert_eq!(scan.total_checked, 40);
        assert_eq!(scan.anomalies.len(), 1);
        let flagged = &scan.anomalies[0];
        assert_eq!(flagged.index, 17);
        assert!(flagged.fare_z_score > 2.5);
        assert!(flagged.speed_z_score.abs() <= 2.5);
    }

    #[test]
    fn test_scan_respects_limit() {
        let mut trips = ordinary_trips(200);
        for i in [10, 20, 30] {
            trips[i] = trip(150.0, 2.5, 5.0);
        }

        let scan = scan_trips(&trips, 2.5, 2).unwrap();
        let indices: Vec<usize> = scan.anomalies.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![10, 20]);
    }

    #[test]
    fn test_scan_empty_batch() {
        let scan = scan_trips(&[], 2.5, 50).unwrap();
        assert!(scan.anomalies.is_empty());
        assert_eq!(scan.total_checked, 0);
    }

    #[test]
    fn test_scan_rejects_bad_parameters() {
        let trips = ordinary_trips(3);
        assert!(matches!(
            scan_trips(&trips, 2.5, 0),
            Err(Error::InvalidConfiguration { parameter: "limit", .. })
        ));
        assert!(scan_trips(&trips, f64::INFINITY, 5).is_err());
    }

    #[test]
    fn test_scan_serializes() {
        let scan = scan_trips(&ordinary_trips(5), 2.5, 50).unwrap();
        let json = serde_json::to_value(&scan).unwrap();
        assert_eq!(json["total_checked"], 5);
        assert_eq!(json["threshold"], 2.5);
        assert!(json["anomalies"].as_array().unwrap().is_empty());
    }
}
