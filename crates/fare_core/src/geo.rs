//! Geographic primitives: validated coordinates, great-circle distance and
//! the travel-time heuristic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Range violations caught when constructing a [`Coordinate`].
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS-84 point. Built through [`Coordinate::new`] so the range invariants
/// hold everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Great-circle distance between two coordinates via the haversine formula.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Travel-time heuristic: ten minutes of base overhead plus two minutes per
/// kilometre. A fixed affine placeholder, not a routing-engine estimate.
pub fn estimate_eta_minutes(distance_km: f64) -> u32 {
    (10.0 + distance_km * 2.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid coordinate")
    }

    #[test]
    fn coordinate_rejects_out_of_range_values() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -181.0),
            Err(GeoError::LongitudeOutOfRange(-181.0))
        );
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = coord(33.6844, 73.0479);
        let b = coord(33.7000, 73.0600);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let a = coord(33.6844, 73.0479);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn haversine_matches_known_short_hop() {
        // Two points in Islamabad roughly two kilometres apart.
        let a = coord(33.6844, 73.0479);
        let b = coord(33.7000, 73.0600);
        let distance = haversine_km(a, b);
        assert!(
            (1.8..2.2).contains(&distance),
            "unexpected distance {distance}"
        );
    }

    #[test]
    fn eta_heuristic_fixed_points() {
        assert_eq!(estimate_eta_minutes(0.0), 10);
        assert_eq!(estimate_eta_minutes(5.0), 20);
    }
}
