//! Pickup-zone bucketing for top-K location queries.
//!
//! Coordinates are rounded to 0.01° (about 1 km) and stored as integer
//! hundredths so zones can key a frequency table.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ensure_finite, Result};
use crate::top_k::TopKFrequent;

/// Zone resolution in degrees.
pub const ZONE_RESOLUTION_DEG: f64 = 0.01;

/// A 0.01° latitude/longitude cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupZone {
    lat_centi: i32,
    lng_centi: i32,
}

impl PickupZone {
    /// Buckets a coordinate, rounding half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteValue`](crate::Error::NonFiniteValue) if
    /// either coordinate is NaN or infinite.
    pub fn from_coords(lat: f64, lng: f64) -> Result<Self> {
        let lat = ensure_finite(lat)?;
        let lng = ensure_finite(lng)?;
        Ok(Self { lat_centi: (lat * 100.0).round() as i32, lng_centi: (lng * 100.0).round() as i32 })
    }

    /// Latitude of the cell centre.
    #[must_use]
    pub fn lat(&self) -> f64 {
        f64::from(self.lat_centi) / 100.0
    }

    /// Longitude of the cell centre.
    #[must_use]
    pub fn lng(&self) -> f64 {
        f64::from(self.lng_centi) / 100.0
    }
}

/// A zone and how many pickups fell in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCount {
    /// Zone latitude.
    pub lat: f64,
    /// Zone longitude.
    pub lng: f64,
    /// Pickups counted in the zone.
    pub count: u64,
}

/// Buckets pickup coordinates into zones and returns the `k` busiest.
///
/// Zones are tallied exactly first, then fed to [`TopKFrequent`] one
/// aggregated count per zone.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
/// if `k` is 0 and [`Error::NonFiniteValue`](crate::Error::NonFiniteValue) for
/// any non-finite coordinate.
pub fn top_pickup_zones<I>(coords: I, k: usize) -> Result<Vec<ZoneCount>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut top = TopKFrequent::new(k)?;

    let mut tally: HashMap<PickupZone, u64> = HashMap::new();
    for (lat, lng) in coords {
        *tally.entry(PickupZone::from_coords(lat, lng)?).or_insert(0) += 1;
    }
    tracing::debug!(zones = tally.len(), k, "pickup zones tallied");

    for (zone, count) in tally {
        top.add_count(zone, count);
    }

    Ok(top
        .get_top_k()
        .into_iter()
        .map(|(zone, count)| ZoneCount { lat: zone.lat(), lng: zone.lng(), count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_nearby_coordinates_share_a_zone() {
        let a = PickupZone::from_coords(40.7512, -73.9871).unwrap();
        let b = PickupZone::from_coords(40.7488, -73.9912).unwrap();
        assert_eq!(a, b);
        assert_relative_eq!(a.lat(), 40.75);
        assert_relative_eq!(a.lng(), -73.99);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let zone = PickupZone::from_coords(0.125, -0.125).unwrap();
        assert_relative_eq!(zone.lat(), 0.13);
        assert_relative_eq!(zone.lng(), -0.13);
    }

    #[test]
    fn test_top_zones_sorted_by_count() {
        let mut coords = Vec::new();
        coords.extend(std::iter::repeat((40.75, -73.99)).take(5));
        coords.extend(std::iter::repeat((40.64, -73.78)).take(8));
        coords.extend(std::iter::repeat((40.77, -73.87)).take(2));

        let zones = top_pickup_zones(coords, 2).unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].count, 8);
        assert_relative_eq!(zones[0].lat, 40.64);
        assert_eq!(zones[1].count, 5);
        assert_relative_eq!(zones[1].lng, -73.99);
    }

    #[test]
    fn test_no_coordinates() {
        assert!(top_pickup_zones(Vec::<(f64, f64)>::new(), 3).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            top_pickup_zones(vec![(40.0, -73.0)], 0),
            Err(Error::InvalidConfiguration { parameter: "k", .. })
        ));
        assert!(matches!(
            top_pickup_zones(vec![(f64::NAN, -73.0)], 3),
            Err(Error::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_zone_count_serializes() {
        let zones = top_pickup_zones(vec![(40.75, -73.99)], 1).unwrap();
        let json = serde_json::to_string(&zones).unwrap();
        assert_eq!(json, r#"[{"lat":40.75,"lng":-73.99,"count":1}]"#);
    }
}
